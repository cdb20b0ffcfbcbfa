//! **ottdkit** - a Rust library for decoding OpenTTD savegames.
//!
//! A savegame is an 8-byte header, a compressed body and, inside it, a
//! stream of tagged chunks. Decoding runs in two phases: the body is
//! decompressed into memory, then the chunks are read in file order into a
//! [`GameState`].
//!
//! # Layers
//! | Module | Role |
//! |--------|------|
//! | [`save`]        | Header, [`GameState::parse`] and [`GameState::load`] |
//! | [`compression`] | `OTTN` / `OTTD` (LZO) / `OTTZ` (zlib) / `OTTX` (LZMA) transports |
//! | [`chunks`]      | Chunk registry, dispatch and per-chunk handlers |
//! | [`schema`]      | Version-gated field layouts |
//! | [`state`]       | Decoded map, companies and dates |
//! | [`date`]        | Day-count calendar |
//!
//! ```no_run
//! let state = ottdkit::load("autosave.sav")?;
//! for (slot, company) in state.active_companies() {
//!     println!("{slot}: {}", company.name.as_deref().unwrap_or_default());
//! }
//! # Ok::<(), ottdkit::Error>(())
//! ```

pub mod chunks;
pub mod compression;
pub mod date;
pub mod error;
pub mod options;
pub mod save;
pub mod schema;
pub mod state;
mod utils;

use std::path::Path;

pub use date::Date;
pub use error::{Error, Result};
pub use options::{LoadOptions, UnknownChunks};
pub use save::Header;
pub use state::{Company, EconomyEntry, GameState, Owner, Tile, TileMap, TileType};

/// Load the savegame at `path` with default options.
pub fn load<P: AsRef<Path>>(path: P) -> Result<GameState> {
    GameState::load(path)
}

/// Load the savegame at `path`.
pub fn load_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<GameState> {
    GameState::load_with(path, options)
}
