//! `DATE`: the current in-game date.

use std::io::SeekFrom;

use tracing::debug;

use super::{ChunkTag, Source, riff_length};
use crate::Result;
use crate::date::{DAYS_TILL_ORIGINAL_BASE_YEAR, Date};
use crate::state::GameState;
use crate::utils::{be_i32, be_u16};

/// Version that widened the day counter to 32 bits and moved its epoch to
/// year 0.
const WIDE_DATE_VERSION: u16 = 31;

/// Read the day counter at the start of the chunk; the rest of the body
/// is skipped. An empty chunk leaves the date unset.
pub fn read_date(r: &mut dyn Source, tag: ChunkTag, state: &mut GameState) -> Result<()> {
    let len = riff_length(r, tag)?;
    if len == 0 {
        return Ok(());
    }
    let end = r.stream_position()? + len as u64;

    let days = if state.version < WIDE_DATE_VERSION {
        be_u16(r)? as i32 + DAYS_TILL_ORIGINAL_BASE_YEAR
    } else {
        be_i32(r)?
    };
    let date = Date::from_days(days);
    debug!(%date, "current date");
    state.current_date = Some(date);

    r.seek(SeekFrom::Start(end))?;
    Ok(())
}
