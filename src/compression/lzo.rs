//! `OTTD` transport: a sequence of independently compressed LZO1X blocks.
//!
//! ## Block Layout
//! ```text
//! [0x00] Checksum  - Adler-32 (seed 0) of the raw size bytes + payload (u32)
//! [0x04] Size      - compressed payload length                          (u32)
//! [0x08] Payload   - LZO1X-compressed data, at most 8192 bytes once decoded
//! ```
//!
//! Both header words are little-endian in version 0 savegames and
//! big-endian in every later version. The stream ends cleanly when no
//! further block header follows.

use std::io::Read;

use adler2::Adler32;
use tracing::trace;

use crate::utils::bytesv;
use crate::{Error, Result};

/// Largest decoded size of one block.
pub const BLOCK_SIZE: usize = 8192;

/// Size of the reference decoder's block buffer; the 4 raw size bytes and
/// the compressed payload must fit in it.
const BLOCK_BUFFER_SIZE: usize = BLOCK_SIZE + BLOCK_SIZE / 16 + 64 + 3 + 8;

/// Decompress every block in `r`, appending the output to `out`.
pub fn decompress_lzo<R: Read + ?Sized>(r: &mut R, version: u16, out: &mut Vec<u8>) -> Result<()> {
    let mut blocks = 0usize;
    while let Some(header) = read_block_header(r)? {
        let (checksum, size_raw) = header.split_at(4);
        let decode = |b: &[u8]| -> u32 {
            let b = [b[0], b[1], b[2], b[3]];
            if version == 0 {
                u32::from_le_bytes(b)
            } else {
                u32::from_be_bytes(b)
            }
        };
        let checksum = decode(checksum);
        let size = decode(size_raw) as usize;

        if size + 4 > BLOCK_BUFFER_SIZE {
            return Err(Error::CorruptBlock("inconsistent size"));
        }
        let payload = bytesv(r, size)?;

        let mut adler = Adler32::from_checksum(0);
        adler.write_slice(size_raw);
        adler.write_slice(&payload);
        if adler.checksum() != checksum {
            return Err(Error::CorruptBlock("bad checksum"));
        }

        let decoded = lzokay_native::decompress_all(&payload, None).map_err(|_| Error::Lzo)?;
        if decoded.len() > BLOCK_SIZE {
            return Err(Error::CorruptBlock("block decodes past its buffer"));
        }
        trace!(block = blocks, size, decoded = decoded.len(), "lzo block");
        out.try_reserve(decoded.len())?;
        out.extend_from_slice(&decoded);
        blocks += 1;
    }
    Ok(())
}

/// Read the next 8-byte block header.
///
/// Returns [`None`] when the stream ends exactly on a block boundary; a
/// header cut short is [`Error::UnexpectedEof`].
fn read_block_header<R: Read + ?Sized>(r: &mut R) -> Result<Option<[u8; 8]>> {
    let mut header = [0u8; 8];
    let mut filled = 0;
    while filled < header.len() {
        match r.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        8 => Ok(Some(header)),
        _ => Err(Error::UnexpectedEof),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame an already compressed payload as one block.
    fn frame(payload: &[u8], big_endian: bool) -> Vec<u8> {
        let size = payload.len() as u32;
        let size_raw = if big_endian {
            size.to_be_bytes()
        } else {
            size.to_le_bytes()
        };
        let mut adler = Adler32::from_checksum(0);
        adler.write_slice(&size_raw);
        adler.write_slice(payload);
        let checksum = if big_endian {
            adler.checksum().to_be_bytes()
        } else {
            adler.checksum().to_le_bytes()
        };

        let mut block = checksum.to_vec();
        block.extend_from_slice(&size_raw);
        block.extend_from_slice(payload);
        block
    }

    /// One block holding `data` as a single LZO1X literal run.
    fn literal_block(data: &[u8], big_endian: bool) -> Vec<u8> {
        assert!(data.len() <= 238);
        let mut payload = vec![17 + data.len() as u8];
        payload.extend_from_slice(data);
        payload.extend_from_slice(&[0x11, 0x00, 0x00]);
        frame(&payload, big_endian)
    }

    /// Tile-like data: short runs with a drifting value.
    fn mixed(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i / 7) * 31 % 251) as u8).collect()
    }

    #[test]
    fn decodes_consecutive_blocks() {
        let mut input = literal_block(b"hello ", true);
        input.extend(literal_block(b"world", true));
        let mut out = Vec::new();
        decompress_lzo(&mut &input[..], 150, &mut out).unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn version_zero_headers_are_little_endian() {
        let input = literal_block(b"ancient", false);
        let mut out = Vec::new();
        decompress_lzo(&mut &input[..], 0, &mut out).unwrap();
        assert_eq!(out, b"ancient");
    }

    #[test]
    fn empty_stream_is_empty_output() {
        let mut out = Vec::new();
        decompress_lzo(&mut &b""[..], 150, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn bad_checksum_is_corrupt_block() {
        let mut input = literal_block(b"hello", true);
        input[3] ^= 0x01;
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzo(&mut &input[..], 150, &mut out),
            Err(Error::CorruptBlock("bad checksum"))
        ));
    }

    #[test]
    fn oversized_block_is_corrupt() {
        let mut input = vec![0u8; 4];
        input.extend_from_slice(&(BLOCK_BUFFER_SIZE as u32).to_be_bytes());
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzo(&mut &input[..], 150, &mut out),
            Err(Error::CorruptBlock("inconsistent size"))
        ));
    }

    #[test]
    fn partial_header_is_eof() {
        let input = literal_block(b"hello", true);
        let mut truncated = input.clone();
        truncated.extend_from_slice(&input[..5]);
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzo(&mut &truncated[..], 150, &mut out),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn full_block_round_trips() {
        let data = mixed(BLOCK_SIZE);
        let input = frame(&lzokay_native::compress(&data).unwrap(), true);
        let mut out = Vec::new();
        decompress_lzo(&mut &input[..], 150, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn block_larger_than_buffer_is_corrupt() {
        let data = mixed(BLOCK_SIZE + 1);
        let payload = lzokay_native::compress(&data).unwrap();
        assert!(payload.len() + 4 <= BLOCK_BUFFER_SIZE);
        let input = frame(&payload, true);
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzo(&mut &input[..], 150, &mut out),
            Err(Error::CorruptBlock("block decodes past its buffer"))
        ));
        assert!(out.is_empty());
    }
}
