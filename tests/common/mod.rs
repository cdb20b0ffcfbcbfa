#![allow(dead_code)]

#[cfg(feature = "compression")]
use std::io::Write;

use ottdkit::compression::Transport;
use ottdkit::schema::{
    COMPANY_AFTER_AI_FLAG, COMPANY_AFTER_COLOR, COMPANY_BANKRUPTCY, COMPANY_SHARE_OWNERS,
    SETTINGS_BEFORE_START_YEAR, Skip, skipped_len,
};

/// Encode a compact integer.
pub fn gamma(v: u32) -> Vec<u8> {
    match v {
        0..=0x7F => vec![v as u8],
        0x80..=0x3FFF => vec![0x80 | (v >> 8) as u8, v as u8],
        0x4000..=0x1F_FFFF => vec![0xC0 | (v >> 16) as u8, (v >> 8) as u8, v as u8],
        _ => vec![0xE0 | (v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8],
    }
}

/// Builds savegame files chunk by chunk.
#[derive(Debug, Clone)]
pub struct SaveBuilder {
    version: u16,
    body: Vec<u8>,
}

impl SaveBuilder {
    pub fn new(version: u16) -> Self {
        Self {
            version,
            body: Vec::new(),
        }
    }

    /// Append a length-prefixed chunk.
    pub fn riff(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
        assert!(data.len() < 1 << 28);
        let len = data.len() as u32;
        let word = (len & 0x00FF_FFFF) | ((len >> 24) << 28);
        self.body.extend_from_slice(tag);
        self.body.extend_from_slice(&word.to_be_bytes());
        self.body.extend_from_slice(data);
        self
    }

    /// Append a dense array chunk.
    pub fn array(mut self, tag: &[u8; 4], elements: &[Vec<u8>]) -> Self {
        self.body.extend_from_slice(tag);
        self.body.push(1);
        for e in elements {
            self.body.extend(gamma(e.len() as u32 + 1));
            self.body.extend_from_slice(e);
        }
        self.body.push(0);
        self
    }

    /// Append bytes verbatim.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// The chunk stream, terminated.
    pub fn body(&self) -> Vec<u8> {
        let mut body = self.body.clone();
        body.extend_from_slice(&[0; 4]);
        body
    }

    /// A complete file wrapped in `transport`.
    pub fn build(&self, transport: Transport) -> Vec<u8> {
        let mut out = transport.tag().to_vec();
        out.extend_from_slice(&((self.version as u32) << 16).to_be_bytes());
        let body = self.body();
        match transport {
            Transport::None => out.extend_from_slice(&body),
            #[cfg(feature = "compression")]
            Transport::Lzo => {
                for piece in body.chunks(200) {
                    out.extend(lzo_block(piece, self.version));
                }
            }
            #[cfg(feature = "compression")]
            Transport::Zlib => {
                let mut enc =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                enc.write_all(&body).unwrap();
                out.extend(enc.finish().unwrap());
            }
            #[cfg(feature = "compression")]
            Transport::Lzma => {
                let mut enc = xz2::write::XzEncoder::new(Vec::new(), 6);
                enc.write_all(&body).unwrap();
                out.extend(enc.finish().unwrap());
            }
            #[cfg(not(feature = "compression"))]
            _ => panic!("{transport} needs the compression feature"),
        }
        out
    }
}

/// One LZO block holding `data` as a single literal run.
#[cfg(feature = "compression")]
pub fn lzo_block(data: &[u8], version: u16) -> Vec<u8> {
    assert!(!data.is_empty() && data.len() <= 238);
    let mut payload = vec![17 + data.len() as u8];
    payload.extend_from_slice(data);
    payload.extend_from_slice(&[0x11, 0x00, 0x00]);

    let word = |v: u32| {
        if version == 0 {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        }
    };
    let size_raw = word(payload.len() as u32);
    let mut adler = adler2::Adler32::from_checksum(0);
    adler.write_slice(&size_raw);
    adler.write_slice(&payload);

    let mut block = word(adler.checksum()).to_vec();
    block.extend_from_slice(&size_raw);
    block.extend_from_slice(&payload);
    block
}

/// `MAPS` body.
pub fn map_size(width: u32, height: u32) -> Vec<u8> {
    let mut b = width.to_be_bytes().to_vec();
    b.extend_from_slice(&height.to_be_bytes());
    b
}

/// `PATS` body for `version` carrying `start_year`.
pub fn settings(version: u16, start_year: i32) -> Vec<u8> {
    let mut b = vec![0; skipped_len(SETTINGS_BEFORE_START_YEAR, version) as usize];
    b.extend_from_slice(&start_year.to_be_bytes());
    b.extend_from_slice(&[0; 16]);
    b
}

/// A human company record in the layout of `version` (84 or later).
pub fn company(version: u16, name: &str, money: i64, color: u8) -> Vec<u8> {
    assert!(version >= 84);
    let pad = |b: &mut Vec<u8>, table: &[Skip]| {
        b.extend(vec![0; skipped_len(table, version) as usize]);
    };

    let mut b = vec![0; 6];
    b.extend(gamma(name.len() as u32));
    b.extend_from_slice(name.as_bytes());
    b.extend_from_slice(&[0; 6]);
    b.extend(gamma(0));
    b.extend_from_slice(&42u32.to_be_bytes());
    b.extend_from_slice(&money.to_be_bytes());
    b.extend_from_slice(&0i64.to_be_bytes());
    b.push(color);
    pad(&mut b, COMPANY_AFTER_COLOR);
    b.extend_from_slice(&1950i32.to_be_bytes());
    pad(&mut b, COMPANY_SHARE_OWNERS);
    b.push(1);
    pad(&mut b, COMPANY_BANKRUPTCY);
    b.extend(vec![0; 3 * 13 * 8]);
    b.push(0);
    pad(&mut b, COMPANY_AFTER_AI_FLAG);
    for value in [1_000i64, 2_000] {
        b.extend_from_slice(&value.to_be_bytes());
        b.extend_from_slice(&(-value).to_be_bytes());
        b.extend_from_slice(&(value * 10).to_be_bytes());
        b.extend_from_slice(&7i32.to_be_bytes());
        b.extend_from_slice(&300i32.to_be_bytes());
    }
    b
}

/// A small but complete savegame: a 4x3 map, a date, settings, two
/// companies in slots 1 and 2, and a few chunks that are only skipped.
pub fn sample(version: u16) -> SaveBuilder {
    let tiles: Vec<u8> = (0..12u8).map(|i| ((i % 11) << 4) | (i % 16)).collect();
    let owners: Vec<u8> = (0..12u8).map(|i| if i < 6 { 1 } else { 0x10 }).collect();
    SaveBuilder::new(version)
        .riff(b"MAPS", &map_size(4, 3))
        .riff(b"MAPT", &tiles)
        .riff(b"MAPO", &owners)
        .riff(b"DATE", &730_120i32.to_be_bytes())
        .riff(b"VIEW", &[0; 12])
        .array(b"CITY", &[vec![1, 2, 3], vec![], vec![4]])
        .riff(b"PATS", &settings(version, 1950))
        .array(
            b"PLYR",
            &[
                vec![],
                company(version, "Acme Rail", 250_000, 3),
                company(version, "Bee Lines", -4_000, 9),
            ],
        )
}
