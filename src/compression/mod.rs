//! Savegame body decompression.
//!
//! The 4-byte format tag at the start of a savegame selects one of four
//! transports. Whatever the transport, [`decompress`] materializes the whole
//! body into memory and hands back a seekable [`Cursor`]: the chunk layer
//! seeks to record and chunk boundaries, so a forward-only stream is not
//! enough.
//!
//! | Tag    | Transport | Module |
//! |--------|-----------|--------|
//! | `OTTN` | none (verbatim copy) | - |
//! | `OTTD` | LZO1X blocks with Adler-32 checksums | [`lzo`] |
//! | `OTTZ` | zlib stream | [`zlib`] |
//! | `OTTX` | xz / LZMA stream | [`lzma`] |
//!
//! The codec transports need the `compression` feature (on by default).
//! Without it only `OTTN` files decode; the other tags are still
//! recognized but fail with [`Error::UnsupportedFormat`].

#[cfg(feature = "compression")]
pub mod lzma;
#[cfg(feature = "compression")]
pub mod lzo;
#[cfg(feature = "compression")]
pub mod zlib;

use std::fmt;
use std::io::{self, Cursor, Read};

use tracing::debug;

use crate::options::LoadOptions;
use crate::{Error, Result};

/// Compression transport wrapping a savegame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// `OTTN`: uncompressed.
    None,
    /// `OTTD`: checksummed LZO1X blocks.
    Lzo,
    /// `OTTZ`: zlib.
    Zlib,
    /// `OTTX`: xz / LZMA.
    Lzma,
}

impl Transport {
    /// Map a format tag to its transport.
    pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
        match &tag {
            b"OTTN" => Some(Transport::None),
            b"OTTD" => Some(Transport::Lzo),
            b"OTTZ" => Some(Transport::Zlib),
            b"OTTX" => Some(Transport::Lzma),
            _ => None,
        }
    }

    /// The format tag that selects this transport.
    pub fn tag(self) -> [u8; 4] {
        match self {
            Transport::None => *b"OTTN",
            Transport::Lzo => *b"OTTD",
            Transport::Zlib => *b"OTTZ",
            Transport::Lzma => *b"OTTX",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::None => "none",
            Transport::Lzo => "lzo",
            Transport::Zlib => "zlib",
            Transport::Lzma => "lzma",
        })
    }
}

/// Decompress a savegame body.
///
/// `r` must be positioned just past the 8-byte savegame header. `version`
/// is the savegame version from that header; only the LZO transport looks
/// at it (to pick the byte order of its block headers).
pub fn decompress<R: Read>(
    r: &mut R,
    transport: Transport,
    version: u16,
    options: &LoadOptions,
) -> Result<Cursor<Vec<u8>>> {
    debug!(%transport, version, "decompressing savegame body");
    let mut out = Vec::new();
    match transport {
        Transport::None => {
            io::copy(r, &mut out)?;
        }
        #[cfg(feature = "compression")]
        Transport::Lzo => lzo::decompress_lzo(r, version, &mut out)?,
        #[cfg(feature = "compression")]
        Transport::Zlib => zlib::decompress_zlib(r, &mut out)?,
        #[cfg(feature = "compression")]
        Transport::Lzma => lzma::decompress_lzma(r, options.lzma_memlimit, &mut out)?,
        #[cfg(not(feature = "compression"))]
        _ => {
            let _ = (version, options);
            return Err(Error::UnsupportedFormat(transport.tag()));
        }
    }
    debug!(bytes = out.len(), "decompressed savegame body");
    Ok(Cursor::new(out))
}

/// Size of the input and output buffers of the streaming pump.
#[cfg(feature = "compression")]
const PUMP_BUFFER_SIZE: usize = 64 * 1024;

/// Outcome of one [`StreamCodec::step`].
#[cfg(feature = "compression")]
#[derive(Debug, Clone, Copy)]
pub(crate) struct Step {
    pub consumed: usize,
    pub produced: usize,
    pub finished: bool,
}

/// A push-style streaming decoder: feed it input, it fills output.
#[cfg(feature = "compression")]
pub(crate) trait StreamCodec {
    /// Run one decode step over `input`, writing into `output`.
    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<Step>;
}

/// Pull-based reader over a [`StreamCodec`].
///
/// Keeps one buffer of undecoded input and one of decoded output, refilling
/// the first from the inner reader whenever the codec has drained it.
#[cfg(feature = "compression")]
pub(crate) struct StreamDecoder<R, C> {
    inner: R,
    codec: C,
    input: Vec<u8>,
    start: usize,
    end: usize,
    output: Vec<u8>,
    /// The previous step filled `output`, so the codec may still hold
    /// decoded bytes without needing more input.
    pending: bool,
    finished: bool,
}

#[cfg(feature = "compression")]
impl<R: Read, C: StreamCodec> StreamDecoder<R, C> {
    pub(crate) fn new(inner: R, codec: C) -> Self {
        Self {
            inner,
            codec,
            input: vec![0u8; PUMP_BUFFER_SIZE],
            start: 0,
            end: 0,
            output: vec![0u8; PUMP_BUFFER_SIZE],
            pending: false,
            finished: false,
        }
    }

    /// Decode the next run of bytes.
    ///
    /// Returns an empty slice once the codec reports end of stream. Running
    /// out of input before that is [`Error::UnexpectedEof`].
    pub(crate) fn next_chunk(&mut self) -> Result<&[u8]> {
        if self.finished {
            return Ok(&[]);
        }
        loop {
            if self.start == self.end && !self.pending {
                self.end = self.inner.read(&mut self.input)?;
                self.start = 0;
                if self.end == 0 {
                    return Err(Error::UnexpectedEof);
                }
            }

            let had_input = self.start < self.end;
            let step = self
                .codec
                .step(&self.input[self.start..self.end], &mut self.output)?;
            self.start += step.consumed;
            self.pending = step.produced == self.output.len();
            self.finished = step.finished;

            if step.produced > 0 || self.finished {
                return Ok(&self.output[..step.produced]);
            }
            if step.consumed == 0 && had_input {
                return Err(Error::Parse("compressed stream stalled"));
            }
        }
    }

    /// Decode everything into `out`.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        loop {
            let chunk = self.next_chunk()?;
            if chunk.is_empty() {
                return Ok(());
            }
            out.try_reserve(chunk.len())?;
            out.extend_from_slice(chunk);
        }
    }
}
