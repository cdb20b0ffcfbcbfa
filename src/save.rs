//! Savegame header and load entry points.
//!
//! ## Header Layout
//! ```text
//! [0x00] Format tag - selects the compression transport ([u8; 4])
//! [0x04] Version    - savegame version in the high 16 bits   (u32)
//! [0x08] Body       - compressed chunk stream
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::chunks::read_chunks;
use crate::compression::{Transport, decompress};
use crate::options::LoadOptions;
use crate::state::GameState;
use crate::utils::{be_u32, bytesa};
use crate::{Error, Result};

/// The fixed 8-byte savegame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub transport: Transport,
    pub version: u16,
}

impl Header {
    /// Read and validate the header.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let tag: [u8; 4] = bytesa(r)?;
        let transport = Transport::from_tag(tag).ok_or(Error::UnsupportedFormat(tag))?;
        let version = (be_u32(r)? >> 16) as u16;
        Ok(Self { transport, version })
    }
}

impl GameState {
    /// Decode a savegame from `reader` with default options.
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        Self::parse_with(reader, &LoadOptions::default())
    }

    /// Decode a savegame from `reader`.
    ///
    /// On error the partially filled state is dropped; nothing is returned.
    pub fn parse_with<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Self> {
        let header = Header::read(&mut reader)?;
        debug!(transport = %header.transport, version = header.version, "savegame header");

        let mut body = decompress(&mut reader, header.transport, header.version, options)?;
        let mut state = GameState {
            version: header.version,
            ..GameState::default()
        };
        read_chunks(&mut body, &mut state, options)?;
        Ok(state)
    }

    /// Open and decode the savegame at `path` with default options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Open and decode the savegame at `path`.
    pub fn load_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(Error::Io)?;
        Self::parse_with(BufReader::new(file), options)
    }
}
