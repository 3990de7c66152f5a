//! Configuration errors
//!
//! Everything here is fatal at load time: a session is never built from a
//! config that fails validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TileId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tile catalog has no normal tiles to spawn")]
    EmptySpawnPool,
    #[error("tile id {0} is defined more than once")]
    DuplicateTileId(TileId),
    #[error("bomb tile {0} has no radius")]
    MissingBombRadius(TileId),
    #[error("super rules: rule table must not be empty")]
    EmptyRuleTable,
    #[error("super rules: minGroupToDestroy must be >= 2, got {0}")]
    MinGroupTooSmall(usize),
    #[error("super rules: rule thresholds must be > 0")]
    ZeroRuleThreshold,
    #[error("super rules: rule with minGroup {0} has no spawn ids")]
    EmptySpawnIds(usize),
    #[error("unknown tile id {0}")]
    UnknownTileId(TileId),
    #[error("tile id {0} is not a super tile")]
    NotSuperTile(TileId),
    #[error("gameplay: rows/cols must be > 0, got {rows}x{cols}")]
    InvalidDimensions { rows: i64, cols: i64 },
    #[error("gameplay: scorePerTile must be > 0, got {0}")]
    InvalidScorePerTile(i64),
    #[error("booster id {0:?} is defined more than once")]
    DuplicateBoosterId(String),
    #[error("super booster {0:?} has no superTileId")]
    MissingSuperTileId(String),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
