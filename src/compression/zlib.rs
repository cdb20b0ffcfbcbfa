//! `OTTZ` transport: the body is one zlib stream (with zlib header).

use std::io::Read;

use flate2::{Decompress, FlushDecompress, Status};

use super::{Step, StreamCodec, StreamDecoder};
use crate::{Error, Result};

struct ZlibCodec(Decompress);

impl StreamCodec for ZlibCodec {
    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Result<Step> {
        let (in_before, out_before) = (self.0.total_in(), self.0.total_out());
        let status = self
            .0
            .decompress(input, output, FlushDecompress::None)
            .map_err(Error::Zlib)?;
        Ok(Step {
            consumed: (self.0.total_in() - in_before) as usize,
            produced: (self.0.total_out() - out_before) as usize,
            finished: matches!(status, Status::StreamEnd),
        })
    }
}

/// Inflate a zlib stream from `r`, appending the output to `out`.
///
/// Input running out before the end-of-stream marker is
/// [`Error::UnexpectedEof`]; anything after the marker is ignored.
pub fn decompress_zlib<R: Read + ?Sized>(r: &mut R, out: &mut Vec<u8>) -> Result<()> {
    StreamDecoder::new(r, ZlibCodec(Decompress::new(true))).drain_into(out)
}
