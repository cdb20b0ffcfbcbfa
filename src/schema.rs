//! Version-gated field layouts.
//!
//! Record layouts in a savegame change field by field across format
//! versions. Fields the decoder does not keep are described here as
//! ordered tables of [`Skip`] entries; [`skip_fields`] applies every entry
//! whose version range covers the savegame, strictly in table order.

use std::io::Seek;
use std::ops::RangeInclusive;

use crate::Result;
use crate::utils::skip;

/// Highest version a range can name.
const MAX_VERSION: u16 = u16::MAX;

/// Bytes to skip when the savegame version lies in `versions`.
#[derive(Debug, Clone)]
pub struct Skip {
    pub versions: RangeInclusive<u16>,
    pub bytes: u32,
}

/// Present in every version.
pub const fn always(bytes: u32) -> Skip {
    Skip {
        versions: 0..=MAX_VERSION,
        bytes,
    }
}

/// Present from version `from` on.
pub const fn since(from: u16, bytes: u32) -> Skip {
    Skip {
        versions: from..=MAX_VERSION,
        bytes,
    }
}

/// Present up to and including version `to`.
pub const fn until(to: u16, bytes: u32) -> Skip {
    Skip {
        versions: 0..=to,
        bytes,
    }
}

/// Present from version `from` to `to`, inclusive.
pub const fn between(from: u16, to: u16, bytes: u32) -> Skip {
    Skip {
        versions: from..=to,
        bytes,
    }
}

/// Total bytes `table` skips for `version`.
pub fn skipped_len(table: &[Skip], version: u16) -> u64 {
    table
        .iter()
        .filter(|s| s.versions.contains(&version))
        .map(|s| s.bytes as u64)
        .sum()
}

/// Seek past every field of `table` present in `version`.
pub fn skip_fields<R: Seek + ?Sized>(r: &mut R, table: &[Skip], version: u16) -> Result<()> {
    skip(r, skipped_len(table, version))
}

/// Game settings stored ahead of the starting year in the `PATS` chunk.
pub const SETTINGS_BEFORE_START_YEAR: &[Skip] = &[
    always(28),
    since(148, 1),
    since(159, 5),
    since(75, 1),
    since(97, 22),
    since(133, 1),
    until(143, 4),
    since(38, 1),
    between(28, 86, 3),
    since(96, 1),
    between(97, 163, 1),
    since(165, 1),
    since(114, 1),
    since(143, 1),
    since(154, 1),
    since(139, 2),
    since(128, 1),
    since(59, 1),
    between(97, 109, 2),
    since(106, 1),
    since(95, 1),
    between(67, 158, 1),
    until(140, 1),
    since(62, 1),
    since(40, 1),
    since(113, 1),
    since(175, 6),
    since(160, 1),
    since(47, 1),
    since(138, 1),
    since(87, 3),
    until(119, 9),
    until(86, 1),
    since(145, 1),
    since(156, 12),
    between(97, 177, 1),
    since(79, 2),
    between(22, 92, 2),
    since(90, 1),
    since(39, 1),
    until(158, 5),
];

/// Company fields between the colour and the inauguration year: money
/// fraction, available railtypes, block preview, cargo types, headquarters
/// tile and last build coordinate.
pub const COMPANY_AFTER_COLOR: &[Skip] = &[
    always(1),
    until(57, 1),
    always(1),
    until(93, 2),
    since(94, 4),
    until(5, 4),
    since(6, 8),
];

/// Company share owners.
pub const COMPANY_SHARE_OWNERS: &[Skip] = &[always(4)];

/// Company bankruptcy state.
pub const COMPANY_BANKRUPTCY: &[Skip] = &[
    always(1),
    until(103, 1),
    since(104, 2),
    always(2),
    until(64, 4),
    since(65, 8),
];

/// Company fields after the AI flag: AI settings, build limits and the
/// per-company settings block.
pub const COMPANY_AFTER_AI_FLAG: &[Skip] = &[
    between(107, 111, 1),
    between(4, 99, 1),
    since(156, 8),
    between(16, 18, 512),
    between(19, 68, 2),
    since(69, 4),
    since(16, 7),
    since(2, 1),
    since(120, 9),
    between(2, 143, 63),
];

/// Legacy AI state up to the build-record count.
pub const LEGACY_AI_HEAD: &[Skip] = &[always(10), until(12, 2), since(13, 4)];

/// Legacy AI state after the build-record count.
pub const LEGACY_AI_TAIL: &[Skip] = &[
    until(5, 8),
    since(6, 16),
    until(68, 2),
    since(69, 4),
    always(77),
    since(2, 64),
];

/// One legacy AI build record.
pub const LEGACY_AI_BUILD_RECORD: &[Skip] = &[until(5, 4), since(6, 8), always(8)];
