//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no external dependencies, making them
//! usable in any context (rules, orchestration, renderers, config loading).
//!
//! # Board Coordinates
//!
//! A board is `rows x cols` cells addressed by [`CellPos`] `{ r, c }`:
//!
//! - **r**: row index, `0..rows`, row 0 is the bottom row (gravity pulls toward it)
//! - **c**: column index, `0..cols`, left to right
//!
//! # Gameplay Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_RESHUFFLES` | 3 | Reshuffle budget per session |
//! | `RESHUFFLE_ITERATION_CAP` | 1000 | Extra shuffles tried per reshuffle |
//! | `DEFAULT_SETTLE_DELAY_MS` | 120 | Pause after refill before re-evaluating |
//! | `MIN_GROUP_FLOOR` | 2 | Lowest accepted `minGroupToDestroy` |
//!
//! # Examples
//!
//! ```
//! use tilematch_types::{CellPos, Tile, TileKind};
//!
//! let bomb = Tile::new(7, TileKind::Bomb { radius: 1 });
//! assert!(bomb.is_super());
//! assert!(!Tile::normal(1).is_super());
//!
//! assert_eq!(TileKind::from_name("rocketRow", None), Some(TileKind::RocketRow));
//! assert_eq!(CellPos::new(2, 3).to_string(), "(2, 3)");
//! ```

use std::fmt;

/// Reshuffle budget used when the gameplay config does not name one
pub const DEFAULT_RESHUFFLES: i32 = 3;

/// Hard cap on extra shuffles while searching for an arrangement with a move
pub const RESHUFFLE_ITERATION_CAP: u32 = 1000;

/// Settle delay after the refill animation (milliseconds)
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 120;

/// Smallest legal `minGroupToDestroy`
pub const MIN_GROUP_FLOOR: usize = 2;

/// Catalog id of a tile (visual + category)
pub type TileId = u32;

/// Board coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellPos {
    pub r: usize,
    pub c: usize,
}

impl CellPos {
    pub const fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

/// Tile kinds
///
/// - **Normal**: matches with 4-connected neighbours of the same id
/// - **Bomb**: clears the square of `radius` around itself
/// - **RocketRow**: clears its row
/// - **RocketCol**: clears its column
///
/// Every kind except `Normal` is a super tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Normal,
    Bomb { radius: u32 },
    RocketRow,
    RocketCol,
}

impl TileKind {
    /// Parse a kind from its catalog name (case-insensitive).
    ///
    /// `radius` is only consulted for `"bomb"`, which requires it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilematch_types::TileKind;
    ///
    /// assert_eq!(TileKind::from_name("normal", None), Some(TileKind::Normal));
    /// assert_eq!(TileKind::from_name("BOMB", Some(2)), Some(TileKind::Bomb { radius: 2 }));
    /// assert_eq!(TileKind::from_name("bomb", None), None);
    /// assert_eq!(TileKind::from_name("rocketcol", None), Some(TileKind::RocketCol));
    /// ```
    pub fn from_name(name: &str, radius: Option<u32>) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "normal" => Some(TileKind::Normal),
            "bomb" => radius.map(|radius| TileKind::Bomb { radius }),
            "rocketrow" => Some(TileKind::RocketRow),
            "rocketcol" => Some(TileKind::RocketCol),
            _ => None,
        }
    }

    /// Catalog name (camelCase, as in the config files)
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Normal => "normal",
            TileKind::Bomb { .. } => "bomb",
            TileKind::RocketRow => "rocketRow",
            TileKind::RocketCol => "rocketCol",
        }
    }

    pub fn is_super(&self) -> bool {
        !matches!(self, TileKind::Normal)
    }
}

/// A tile occupying one board cell
///
/// Tiles are values: a cell's tile is replaced, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

impl Tile {
    pub const fn new(id: TileId, kind: TileKind) -> Self {
        Self { id, kind }
    }

    pub const fn normal(id: TileId) -> Self {
        Self {
            id,
            kind: TileKind::Normal,
        }
    }

    pub fn is_super(&self) -> bool {
        self.kind.is_super()
    }
}

/// A cell on the board
///
/// - `None`: empty cell
/// - `Some(Tile)`: occupied cell
pub type Cell = Option<Tile>;

/// A tile relocation (gravity or reshuffle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: CellPos,
    pub to: CellPos,
}

/// A tile created at a position (generation or refill)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawned {
    pub pos: CellPos,
    pub id: TileId,
}

/// Booster behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoosterKind {
    /// Swap two tiles with different ids
    Swap,
    /// Spawn and immediately activate the given super tile
    Super { super_tile_id: TileId },
}

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Result text shown by the HUD
    pub fn result_text(&self) -> &'static str {
        match self {
            Outcome::Win => "Victory",
            Outcome::Loss => "Defeat",
        }
    }
}
