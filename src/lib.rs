//! Tile-match puzzle engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tilematch::{core,engine,types}`.

pub use tilematch_core as core;
pub use tilematch_engine as engine;
pub use tilematch_types as types;
