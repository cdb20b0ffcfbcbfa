//! `PATS`: game settings. Only the starting year is kept.

use std::io::SeekFrom;

use tracing::debug;

use super::{ChunkTag, Source, riff_length};
use crate::Result;
use crate::schema::{SETTINGS_BEFORE_START_YEAR, skip_fields};
use crate::state::GameState;
use crate::utils::be_i32;

/// Read the starting year out of the settings block. An empty chunk
/// leaves it unset.
pub fn read_settings(r: &mut dyn Source, tag: ChunkTag, state: &mut GameState) -> Result<()> {
    let len = riff_length(r, tag)?;
    if len == 0 {
        return Ok(());
    }
    let end = r.stream_position()? + len as u64;

    skip_fields(r, SETTINGS_BEFORE_START_YEAR, state.version)?;
    state.start_year = be_i32(r)?;
    debug!(start_year = state.start_year, "settings");

    r.seek(SeekFrom::Start(end))?;
    Ok(())
}
