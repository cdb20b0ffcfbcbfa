//! `MAPS`, `MAPT` and `MAPO`: map dimensions and per-tile layers.
//!
//! `MAPS` must come first; it fixes the grid size that every later tile
//! chunk is checked against. Tile chunks hold one byte per tile, row-major.

use std::io::SeekFrom;

use tracing::debug;

use super::{ChunkTag, Source, riff_length};
use crate::state::{GameState, Tile, TileMap, TileType};
use crate::utils::{be_u32, skip};
use crate::{Error, Result};

/// Tiles copied per read.
const TILE_BATCH: usize = 4096;

/// `MAPS`: read the map size and allocate the tile grid.
///
/// A grid with more tiles than bytes left in the body cannot be filled by
/// any tile chunk and is rejected before allocating.
pub fn read_map_size(r: &mut dyn Source, tag: ChunkTag, state: &mut GameState) -> Result<()> {
    let len = riff_length(r, tag)?;
    if len < 8 {
        return Err(Error::Parse("map size chunk too short"));
    }
    let width = be_u32(r)?;
    let height = be_u32(r)?;
    debug!(width, height, "map size");
    skip(r, (len - 8) as u64)?;

    let area = width as u64 * height as u64;
    let remaining = remaining(r)?;
    if area > remaining {
        return Err(Error::SizeMismatch {
            tag,
            expected: area,
            found: remaining,
        });
    }
    state.map = TileMap::new(width, height)?;
    Ok(())
}

/// Bytes between the current position and the end of `r`.
fn remaining(r: &mut dyn Source) -> Result<u64> {
    let pos = r.stream_position()?;
    let end = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(end.saturating_sub(pos))
}

/// `MAPT`: tile class in the high nibble, height in the low nibble.
pub fn read_tile_types(r: &mut dyn Source, tag: ChunkTag, state: &mut GameState) -> Result<()> {
    read_tile_layer(r, tag, &mut state.map, |tile, b| {
        tile.kind = TileType::from_nibble(b >> 4);
        tile.height = b & 0x0F;
    })
}

/// `MAPO`: raw owner byte per tile.
pub fn read_owners(r: &mut dyn Source, tag: ChunkTag, state: &mut GameState) -> Result<()> {
    read_tile_layer(r, tag, &mut state.map, |tile, b| tile.owner_raw = b)
}

/// Read one byte per tile and hand each to `apply`.
///
/// The chunk length is checked against the map area before any tile is
/// touched.
fn read_tile_layer(
    r: &mut dyn Source,
    tag: ChunkTag,
    map: &mut TileMap,
    apply: impl Fn(&mut Tile, u8),
) -> Result<()> {
    let len = riff_length(r, tag)? as u64;
    if len != map.area() {
        return Err(Error::SizeMismatch {
            tag,
            expected: map.area(),
            found: len,
        });
    }

    let mut buf = [0u8; TILE_BATCH];
    for tiles in map.tiles_mut().chunks_mut(TILE_BATCH) {
        let buf = &mut buf[..tiles.len()];
        r.read_exact(buf)?;
        for (tile, b) in tiles.iter_mut().zip(buf.iter()) {
            apply(tile, *b);
        }
    }
    Ok(())
}
