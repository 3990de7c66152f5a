use thiserror::Error;

use crate::types::{CellPos, TileId};

/// Failures of engine calls whose arguments the engine cannot honour
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("position {pos} is outside the {rows}x{cols} board")]
    OutOfBounds { pos: CellPos, rows: usize, cols: usize },
    #[error("unknown tile id {0}")]
    UnknownTile(TileId),
    #[error("tile id {0} is not a super tile")]
    NotSuperTile(TileId),
    #[error("grid is {got_rows}x{got_cols}, session expects {rows}x{cols}")]
    GridSize {
        rows: usize,
        cols: usize,
        got_rows: usize,
        got_cols: usize,
    },
}
