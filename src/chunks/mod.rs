//! Chunk dispatch over a decompressed savegame body.
//!
//! The body is a sequence of chunks, each introduced by a 4-byte
//! big-endian tag; a zero tag ends the stream. A chunk body comes in one
//! of two encodings, told apart by its first byte:
//!
//! ```text
//! length-prefixed: [kind|len_hi] len_lo(3 bytes)  body(len bytes)
//!                   low nibble 0, high nibble = bits 24-27 of len
//! array:           marker(1 = dense, 2 = sparse)
//!                  { gamma(len + 1) [gamma(index) if sparse] element }*
//!                  gamma(0)
//! ```
//!
//! Handlers are looked up in [`REGISTRY`], a table sorted by tag. Tags of
//! no interest map to one of the generic skip handlers.
//!
//! | Module       | Chunks |
//! |--------------|--------|
//! | [`map`]      | `MAPS`, `MAPT`, `MAPO` |
//! | [`date`]     | `DATE` |
//! | [`settings`] | `PATS` |
//! | [`company`]  | `PLYR` |

pub mod company;
pub mod date;
pub mod map;
pub mod settings;

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, warn};

use crate::options::{LoadOptions, UnknownChunks};
use crate::state::GameState;
use crate::utils::{be_u32, gamma, riff_header, skip, u8};
use crate::{Error, Result};

/// A seekable byte source. Handlers take `&mut dyn Source` so one
/// registry serves every reader type.
pub trait Source: Read + Seek {}

impl<T: Read + Seek + ?Sized> Source for T {}

/// Signature of a chunk handler. Called with the stream positioned right
/// after the chunk tag; must leave it right after the chunk body.
pub type Handler = fn(&mut dyn Source, ChunkTag, &mut GameState) -> Result<()>;

/// A 4-character chunk tag, stored as its big-endian integer value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkTag(pub u32);

impl ChunkTag {
    pub const fn new(tag: &[u8; 4]) -> Self {
        Self(u32::from_be_bytes(*tag))
    }

    pub const fn bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes().escape_ascii())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({self})")
    }
}

/// Array chunk marker: elements in slot order.
pub const ARRAY: u8 = 1;
/// Array chunk marker: every element carries its slot index.
pub const SPARSE_ARRAY: u8 = 2;
/// Kind nibble of a length-prefixed chunk.
pub const RIFF: u8 = 0;

const fn entry(tag: &[u8; 4], handler: Handler) -> (ChunkTag, Handler) {
    (ChunkTag::new(tag), handler)
}

/// Every chunk tag the decoder recognizes, sorted by tag value.
pub static REGISTRY: &[(ChunkTag, Handler)] = &[
    entry(b"AIPL", skip_array),
    entry(b"ANIT", skip_riff),
    entry(b"APID", skip_array),
    entry(b"ATID", skip_array),
    entry(b"BKOR", skip_array),
    entry(b"CAPA", skip_array),
    entry(b"CAPR", skip_riff),
    entry(b"CAPY", skip_array),
    entry(b"CHKP", skip_array),
    entry(b"CHTS", skip_riff),
    entry(b"CITY", skip_array),
    entry(b"CMDL", skip_array),
    entry(b"CMPU", skip_array),
    entry(b"DATE", date::read_date),
    entry(b"DEPT", skip_array),
    entry(b"ECMY", skip_riff),
    entry(b"EIDS", skip_array),
    entry(b"ENGN", skip_array),
    entry(b"ENGS", skip_riff),
    entry(b"ERNW", skip_array),
    entry(b"GLOG", skip_riff),
    entry(b"GOAL", skip_array),
    entry(b"GRPS", skip_array),
    entry(b"GSDT", skip_array),
    entry(b"GSTR", skip_array),
    entry(b"HIDS", skip_array),
    entry(b"IBLD", skip_riff),
    entry(b"IIDS", skip_array),
    entry(b"INDY", skip_array),
    entry(b"ITBL", skip_array),
    entry(b"LGRJ", skip_array),
    entry(b"LGRP", skip_array),
    entry(b"LGRS", skip_array),
    entry(b"M3HI", skip_riff),
    entry(b"M3LO", skip_riff),
    entry(b"MAP2", skip_riff),
    entry(b"MAP5", skip_riff),
    entry(b"MAP7", skip_riff),
    entry(b"MAPE", skip_riff),
    entry(b"MAPH", skip_riff),
    entry(b"MAPO", map::read_owners),
    entry(b"MAPS", map::read_map_size),
    entry(b"MAPT", map::read_tile_types),
    entry(b"NAME", skip_array),
    entry(b"NGRF", skip_array),
    entry(b"OBID", skip_array),
    entry(b"OBJS", skip_array),
    entry(b"OPTS", skip_riff),
    entry(b"ORDL", skip_array),
    entry(b"ORDR", skip_array),
    entry(b"PATS", settings::read_settings),
    entry(b"PLYR", company::read_companies),
    entry(b"PRIC", skip_riff),
    entry(b"PSAC", skip_array),
    entry(b"RAIL", skip_array),
    entry(b"ROAD", skip_array),
    entry(b"SIGN", skip_array),
    entry(b"STNN", skip_array),
    entry(b"STNS", skip_array),
    entry(b"STPA", skip_array),
    entry(b"STPE", skip_array),
    entry(b"SUBS", skip_array),
    entry(b"TIDS", skip_array),
    entry(b"VEHS", skip_array),
    entry(b"VIEW", skip_riff),
];

/// Look up the handler for `tag`.
pub fn handler(tag: ChunkTag) -> Option<Handler> {
    REGISTRY
        .binary_search_by_key(&tag, |(t, _)| *t)
        .ok()
        .map(|i| REGISTRY[i].1)
}

/// Run every chunk in `r` through its handler until the zero tag.
pub fn read_chunks(r: &mut dyn Source, state: &mut GameState, options: &LoadOptions) -> Result<()> {
    loop {
        let tag = ChunkTag(be_u32(r)?);
        if tag.0 == 0 {
            return Ok(());
        }
        debug!(%tag, "reading chunk");
        match handler(tag) {
            Some(handler) => handler(r, tag, state)?,
            None if options.unknown_chunks == UnknownChunks::Skip => {
                warn!(%tag, "skipping unknown chunk");
                skip_unknown(r, tag)?;
            }
            None => return Err(Error::UnknownChunk(tag)),
        }
    }
}

/// Read a length-prefixed chunk header, returning the body length.
pub(crate) fn riff_length(r: &mut dyn Source, tag: ChunkTag) -> Result<u32> {
    let (kind, len) = riff_header(r)?;
    if kind != RIFF {
        return Err(Error::InvalidChunkKind { tag, kind });
    }
    Ok(len)
}

/// Read an array chunk marker, returning whether the array is sparse.
pub(crate) fn array_marker(r: &mut dyn Source, tag: ChunkTag) -> Result<bool> {
    match u8(r)? {
        ARRAY => Ok(false),
        SPARSE_ARRAY => Ok(true),
        kind => Err(Error::InvalidChunkKind { tag, kind }),
    }
}

/// Skip a length-prefixed chunk.
pub fn skip_riff(r: &mut dyn Source, tag: ChunkTag, _: &mut GameState) -> Result<()> {
    skip_riff_body(r, tag)
}

/// Skip a dense or sparse array chunk.
pub fn skip_array(r: &mut dyn Source, tag: ChunkTag, _: &mut GameState) -> Result<()> {
    skip_array_body(r, tag)
}

fn skip_riff_body(r: &mut dyn Source, tag: ChunkTag) -> Result<()> {
    let len = riff_length(r, tag)?;
    skip(r, len as u64)
}

fn skip_array_body(r: &mut dyn Source, tag: ChunkTag) -> Result<()> {
    array_marker(r, tag)?;
    loop {
        let len = gamma(r)?;
        if len == 0 {
            return Ok(());
        }
        skip(r, len as u64 - 1)?;
    }
}

/// Skip a chunk with no registered handler, picking the encoding from its
/// kind byte.
fn skip_unknown(r: &mut dyn Source, tag: ChunkTag) -> Result<()> {
    let kind = u8(r)?;
    r.seek(SeekFrom::Current(-1))?;
    match kind & 0x0F {
        RIFF => skip_riff_body(r, tag),
        ARRAY | SPARSE_ARRAY => skip_array_body(r, tag),
        _ => Err(Error::InvalidChunkKind { tag, kind }),
    }
}
