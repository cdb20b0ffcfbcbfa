//! `PLYR`: the company roster.
//!
//! An array chunk with one element per company slot. Elements of length 1
//! are empty slots. In a sparse roster each element names its slot; in a
//! dense one elements fill slots in order.

use std::io::SeekFrom;

use tracing::debug;

use super::{ChunkTag, Source, array_marker};
use crate::date::ORIGINAL_BASE_YEAR;
use crate::schema::{
    COMPANY_AFTER_AI_FLAG, COMPANY_AFTER_COLOR, COMPANY_BANKRUPTCY, COMPANY_SHARE_OWNERS,
    LEGACY_AI_BUILD_RECORD, LEGACY_AI_HEAD, LEGACY_AI_TAIL, skip_fields, skipped_len,
};
use crate::state::{Company, EconomyEntry, GameState, MAX_COMPANIES, MAX_HISTORY_MONTHS};
use crate::utils::{be_i32, be_i64_or_i32, be_u32, gamma, gamma_len, skip, string, u8};
use crate::{Error, Result};

/// First version storing company and manager names inline.
const INLINE_NAMES_VERSION: u16 = 84;
/// First version with the legacy AI state removed.
const NO_LEGACY_AI_VERSION: u16 = 107;

/// Read every roster element into `state.companies`.
pub fn read_companies(r: &mut dyn Source, tag: ChunkTag, state: &mut GameState) -> Result<()> {
    let sparse = array_marker(r, tag)?;
    let version = state.version;
    let mut slot = 0usize;
    loop {
        let mut len = gamma(r)? as u64;
        if len == 0 {
            break;
        }
        if sparse {
            let index = gamma(r)?;
            len = len
                .checked_sub(gamma_len(index))
                .filter(|len| *len > 0)
                .ok_or(Error::Parse("sparse element shorter than its index"))?;
            slot = index as usize;
        }
        if slot >= MAX_COMPANIES {
            return Err(Error::TooManyCompanies);
        }
        if len > 1 {
            let end = r.stream_position()? + len - 1;
            state.companies[slot] = read_company(r, version, slot)?;
            r.seek(SeekFrom::Start(end))?;
        }
        slot += 1;
    }
    debug!(active = state.active_companies().count(), "companies");
    Ok(())
}

fn read_company(r: &mut dyn Source, version: u16, slot: usize) -> Result<Company> {
    let mut c = Company {
        active: true,
        ..Company::default()
    };

    skip(r, 6)?;
    let name = if version >= INLINE_NAMES_VERSION {
        string(r)?
    } else {
        None
    };
    c.name = Some(name.unwrap_or_else(|| format!("Company {}", slot + 1)));
    skip(r, 6)?;
    let manager = if version >= INLINE_NAMES_VERSION {
        string(r)?
    } else {
        None
    };
    c.manager = Some(manager.unwrap_or_else(|| "Unknown".to_owned()));

    c.face = be_u32(r)?;
    c.money = be_i64_or_i32(r, version > 0)?;
    c.loan = be_i64_or_i32(r, version > 64)?;
    c.color = u8(r)?;
    skip_fields(r, COMPANY_AFTER_COLOR, version)?;

    c.inaugurated_year = if version < 31 {
        u8(r)? as i32 + ORIGINAL_BASE_YEAR
    } else {
        be_i32(r)?
    };
    skip_fields(r, COMPANY_SHARE_OWNERS, version)?;
    c.num_valid_stat_ent = u8(r)?.min(MAX_HISTORY_MONTHS as u8);
    skip_fields(r, COMPANY_BANKRUPTCY, version)?;

    for year in &mut c.yearly_expenses {
        for amount in year {
            *amount = be_i64_or_i32(r, version > 1)?;
        }
    }

    if version >= 2 {
        c.ai = u8(r)? != 0;
    }
    skip_fields(r, COMPANY_AFTER_AI_FLAG, version)?;
    if c.ai && version < NO_LEGACY_AI_VERSION {
        skip_legacy_ai(r, version)?;
    }

    let wide = version >= 2;
    c.cur_economy = read_economy(r, wide)?;
    for entry in &mut c.old_economy[..c.num_valid_stat_ent as usize] {
        *entry = read_economy(r, wide)?;
    }

    debug!(slot, name = c.name.as_deref(), ai = c.ai, "company");
    Ok(c)
}

/// Skip the state of the pre-scripting AI, whose build-record count sits
/// in the middle of the block.
fn skip_legacy_ai(r: &mut dyn Source, version: u16) -> Result<()> {
    skip_fields(r, LEGACY_AI_HEAD, version)?;
    let records = u8(r)? as u64;
    skip_fields(r, LEGACY_AI_TAIL, version)?;
    skip(r, records * skipped_len(LEGACY_AI_BUILD_RECORD, version))
}

fn read_economy(r: &mut dyn Source, wide: bool) -> Result<EconomyEntry> {
    Ok(EconomyEntry {
        income: be_i64_or_i32(r, wide)?,
        expenses: be_i64_or_i32(r, wide)?,
        company_value: be_i64_or_i32(r, wide)?,
        delivered_cargo: be_i32(r)?,
        performance: be_i32(r)?,
    })
}
