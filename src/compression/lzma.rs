//! `OTTX` transport: the body is one LZMA stream.
//!
//! Decoded with liblzma's auto-decoder, which accepts both the `.xz`
//! container and the legacy `.lzma` one.

use std::io::Read;

use xz2::stream::{Action, Status, Stream};

use super::{Step, StreamCodec, StreamDecoder};
use crate::{Error, Result};

struct LzmaCodec(Stream);

impl StreamCodec for LzmaCodec {
    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<Step> {
        let (in_before, out_before) = (self.0.total_in(), self.0.total_out());
        let status = self
            .0
            .process(input, output, Action::Run)
            .map_err(Error::Lzma)?;
        Ok(Step {
            consumed: (self.0.total_in() - in_before) as usize,
            produced: (self.0.total_out() - out_before) as usize,
            finished: matches!(status, Status::StreamEnd),
        })
    }
}

/// Decode an LZMA stream from `r`, appending the output to `out`.
///
/// `memlimit` caps the decoder's memory use; streams needing more fail
/// with [`Error::Lzma`]. A step that can make no progress (liblzma's
/// buffer error) lets the pump fetch more input or report a stall.
pub fn decompress_lzma<R: Read + ?Sized>(r: &mut R, memlimit: u64, out: &mut Vec<u8>) -> Result<()> {
    let stream = Stream::new_auto_decoder(memlimit, 0).map_err(Error::Lzma)?;
    StreamDecoder::new(r, LzmaCodec(stream)).drain_into(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use xz2::write::XzEncoder;

    use super::*;
    use crate::options::DEFAULT_LZMA_MEMLIMIT;

    fn xz(data: &[u8]) -> Vec<u8> {
        let mut enc = XzEncoder::new(Vec::new(), 6);
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn decodes_known_plaintext() {
        let plain: Vec<u8> = (0..150_000u32).map(|i| (i * 7 % 253) as u8).collect();
        let mut out = Vec::new();
        decompress_lzma(&mut &xz(&plain)[..], DEFAULT_LZMA_MEMLIMIT, &mut out).unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn truncated_stream_is_eof() {
        let compressed = xz(b"chunks chunks chunks");
        let cut = &compressed[..compressed.len() / 2];
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzma(&mut &cut[..], DEFAULT_LZMA_MEMLIMIT, &mut out),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn garbage_is_lzma_error() {
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzma(&mut &b"\xFDnot an xz stream"[..], DEFAULT_LZMA_MEMLIMIT, &mut out),
            Err(Error::Lzma(_))
        ));
    }

    #[test]
    fn memory_limit_is_lzma_error() {
        let compressed = xz(b"needs a dictionary");
        let mut out = Vec::new();
        assert!(matches!(
            decompress_lzma(&mut &compressed[..], 1, &mut out),
            Err(Error::Lzma(xz2::stream::Error::MemLimit))
        ));
    }
}
