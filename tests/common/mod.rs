//! Shared builders for integration tests.
//!
//! Boards are written bottom row first: `board(&[&[1, 2], &[3, 4]])` puts
//! `1` at `(0, 0)`. Ids follow the built-in catalog: `0` is empty, `1..=4`
//! are Normal, `10` bomb r1, `11` rocketRow, `12` rocketCol, `13` bomb r2.

#![allow(dead_code)]

use std::time::Duration;

use tilematch::core::{GameConfig, Grid};
use tilematch::engine::{GameSession, RecordingRenderer};
use tilematch::types::{Tile, TileId};

pub fn board(rows: &[&[TileId]]) -> Grid {
    let catalog = GameConfig::default().catalog;
    let cells = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|&id| match id {
                    0 => None,
                    id => Some(catalog.tile(id).unwrap_or_else(|| Tile::normal(id))),
                })
                .collect()
        })
        .collect();
    Grid::from_rows(cells).expect("rectangular board")
}

/// Built-in config resized to `rows x cols`, with no settle delay
pub fn config(rows: usize, cols: usize, moves: i64, target: i64) -> GameConfig {
    let mut config = GameConfig::default();
    config.gameplay.rows = rows;
    config.gameplay.cols = cols;
    config.gameplay.start_moves = moves;
    config.gameplay.target_score = target;
    config.gameplay.settle_delay = Duration::ZERO;
    config
}

pub async fn session_on(config: GameConfig, grid: Grid) -> GameSession<RecordingRenderer> {
    let mut session = GameSession::new(config, RecordingRenderer::new(), 7).expect("valid config");
    session.start_with_grid(grid).await.expect("grid matches config");
    session
}
