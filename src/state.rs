//! The decoded world snapshot.
//!
//! A [`GameState`] starts out empty and is filled in by the chunk handlers
//! in file order. It owns every buffer it holds, so dropping it (or
//! dropping a half-filled one when a load fails) releases everything.

use std::slice::ChunksExact;

use crate::date::Date;
use crate::{Error, Result};

/// Number of company slots in a savegame.
pub const MAX_COMPANIES: usize = 15;
/// Number of months of economy history kept per company.
pub const MAX_HISTORY_MONTHS: usize = 24;
/// Number of expense categories.
pub const EXPENSES_END: usize = 13;

/// Decoded savegame contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// Savegame format version.
    pub version: u16,
    /// Tile grid; empty until the map-size chunk is read.
    pub map: TileMap,
    /// Fixed company slots; inactive slots stay at their default.
    pub companies: [Company; MAX_COMPANIES],
    /// Year the game was started in.
    pub start_year: i32,
    /// Current in-game date; [`None`] when the savegame has no date chunk
    /// or an empty one.
    pub current_date: Option<Date>,
}

impl GameState {
    /// Active companies with their slot index (0-based).
    pub fn active_companies(&self) -> impl Iterator<Item = (usize, &Company)> {
        self.companies.iter().enumerate().filter(|(_, c)| c.active)
    }
}

/// Tile class, from the high nibble of a tile-type byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileType {
    /// Grass, rocks, farm fields and similar.
    #[default]
    Clear,
    Railway,
    /// Road or tram tracks.
    Road,
    House,
    Trees,
    Station,
    Water,
    /// Invisible border tiles along the SW and SE edges.
    Void,
    Industry,
    /// Tunnel entrances and bridge heads.
    TunnelBridge,
    /// Transmitters, owned land and other objects.
    Object,
    /// A nibble outside the known classes.
    Unknown(u8),
}

impl TileType {
    /// Decode a tile class nibble.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => TileType::Clear,
            1 => TileType::Railway,
            2 => TileType::Road,
            3 => TileType::House,
            4 => TileType::Trees,
            5 => TileType::Station,
            6 => TileType::Water,
            7 => TileType::Void,
            8 => TileType::Industry,
            9 => TileType::TunnelBridge,
            10 => TileType::Object,
            n => TileType::Unknown(n),
        }
    }
}

/// Classified owner of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Company slot 0-14.
    Company(u8),
    Town,
    Nobody,
    Water,
    Spectator,
    Unknown(u8),
}

impl From<u8> for Owner {
    fn from(raw: u8) -> Self {
        match raw {
            0x00..=0x0E => Owner::Company(raw),
            0x0F => Owner::Town,
            0x10 => Owner::Nobody,
            0x11 => Owner::Water,
            0xFF => Owner::Spectator,
            n => Owner::Unknown(n),
        }
    }
}

/// One map tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileType,
    /// Height level, 0-15.
    pub height: u8,
    /// Raw owner byte as stored in the savegame; see [`Tile::owner`].
    pub owner_raw: u8,
}

impl Tile {
    /// Owner of this tile.
    pub fn owner(&self) -> Owner {
        Owner::from(self.owner_raw)
    }
}

/// Row-major tile grid.
///
/// The tile buffer always holds exactly `width * height` tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Allocate a grid of default tiles.
    ///
    /// Fails with [`Error::Allocation`] when the area does not fit in
    /// memory.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let area = usize::try_from(width as u64 * height as u64).map_err(|_| Error::Allocation)?;
        let mut tiles = Vec::new();
        tiles.try_reserve_exact(area)?;
        tiles.resize(area, Tile::default());
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles, `width * height`.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Tile at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y as usize * self.width as usize + x as usize)
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Iterate over rows, north to south.
    pub fn rows(&self) -> ChunksExact<'_, Tile> {
        self.tiles.chunks_exact(self.width.max(1) as usize)
    }
}

/// One period of a company's finances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EconomyEntry {
    pub income: i64,
    pub expenses: i64,
    pub company_value: i64,
    pub delivered_cargo: i32,
    /// Company score, 0-1000.
    pub performance: i32,
}

/// One company slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Company {
    pub active: bool,
    pub ai: bool,
    /// Company name; a placeholder when the savegame has none. [`None`] for
    /// inactive slots.
    pub name: Option<String>,
    /// Manager name; a placeholder when the savegame has none. [`None`] for
    /// inactive slots.
    pub manager: Option<String>,
    pub face: u32,
    pub inaugurated_year: i32,
    pub money: i64,
    pub loan: i64,
    /// Company colour index.
    pub color: u8,
    /// Expenses for the last three years, per category.
    pub yearly_expenses: [[i64; EXPENSES_END]; 3],
    /// Economy of the running quarter.
    pub cur_economy: EconomyEntry,
    /// Economy history, newest first; only the first
    /// [`num_valid_stat_ent`](Self::num_valid_stat_ent) entries are filled.
    pub old_economy: [EconomyEntry; MAX_HISTORY_MONTHS],
    /// Valid entries in `old_economy`, at most [`MAX_HISTORY_MONTHS`].
    pub num_valid_stat_ent: u8,
}

impl Company {
    /// The filled part of the economy history.
    pub fn history(&self) -> &[EconomyEntry] {
        &self.old_economy[..self.num_valid_stat_ent as usize]
    }
}
