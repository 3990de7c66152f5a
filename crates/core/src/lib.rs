//! Core rules module - pure, deterministic, and testable
//!
//! This crate contains the board model and every game rule of the tile-match
//! puzzle. It has **no dependencies** on rendering, input, or async runtimes, making it:
//!
//! - **Deterministic**: every random draw goes through a caller-supplied `rand::Rng`
//! - **Testable**: boards can be built cell by cell and inspected after each operation
//! - **Portable**: the engine crate drives it, but it runs anywhere
//!
//! # Module Structure
//!
//! - [`grid`]: rows x cols cell storage with get/set/swap
//! - [`tiles`]: affected sets per tile kind (flood fill, bomb square, rockets)
//! - [`rules`]: collect threshold, super-tile reward table, cascade expansion, move detection
//! - [`ops`]: random generation, gravity, refill, Fisher-Yates reshuffle
//! - [`progress`]: moves left, score, target
//! - [`catalog`]: tile id to kind lookup
//! - [`config`]: JSON documents and validation into [`GameConfig`]
//!
//! # Game Rules
//!
//! - **Collect**: clicking a Normal tile destroys its 4-connected same-id group if the
//!   group reaches `minGroupToDestroy`; clicking a super tile always resolves
//! - **Reward**: large Normal groups leave a super tile behind at the clicked cell
//! - **Cascade**: super tiles caught in a blast fire too, each exactly once
//! - **Gravity**: tiles fall toward row 0, then empty cells are refilled
//! - **Reshuffle**: a board with no legal move is shuffled (bounded budget)
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use tilematch_core::{affected, BoardOps, GameConfig, Grid, MatchRules};
//! use tilematch_core::types::CellPos;
//!
//! let config = GameConfig::default();
//! let ops = BoardOps::new(config.catalog.spawn_pool()).unwrap();
//! let rules = MatchRules::new(config.super_rules.clone());
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut grid = Grid::new(config.gameplay.rows, config.gameplay.cols);
//! ops.generate(&mut grid, &mut rng);
//!
//! let group = affected(&grid, CellPos::new(0, 0));
//! assert!(group.contains(&CellPos::new(0, 0)));
//! assert_eq!(rules.has_any_move(&grid), rules.has_any_move(&grid));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod ops;
pub mod progress;
pub mod rules;
pub mod tiles;

pub use tilematch_types as types;

// Re-export commonly used types for convenience
pub use catalog::TileCatalog;
pub use config::{BoosterSpec, ConfigBundle, GameConfig, Gameplay};
pub use error::ConfigError;
pub use grid::Grid;
pub use ops::BoardOps;
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use rules::{MatchRules, SuperRule, SuperTileRules};
pub use tiles::{affected, affected_by, connected_group};
