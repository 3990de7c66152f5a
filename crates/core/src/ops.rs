//! Board operations - random fill, gravity, refill, reshuffle
//!
//! Every operation mutates the grid in place and returns the diff a renderer
//! needs to animate it. New tiles are always drawn from the Normal spawn pool.

use rand::Rng;

use crate::error::ConfigError;
use crate::grid::Grid;
use crate::types::{CellPos, Move, Spawned, Tile, TileId};

#[derive(Debug, Clone)]
pub struct BoardOps {
    spawn_pool: Vec<TileId>,
}

impl BoardOps {
    pub fn new(spawn_pool: Vec<TileId>) -> Result<Self, ConfigError> {
        if spawn_pool.is_empty() {
            return Err(ConfigError::EmptySpawnPool);
        }
        Ok(Self { spawn_pool })
    }

    pub fn spawn_pool(&self) -> &[TileId] {
        &self.spawn_pool
    }

    /// Uniformly random id from the spawn pool
    pub fn random_id<R: Rng + ?Sized>(&self, rng: &mut R) -> TileId {
        self.spawn_pool[rng.random_range(0..self.spawn_pool.len())]
    }

    /// Fill every cell with a fresh random tile
    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Vec<Spawned> {
        let positions: Vec<CellPos> = grid.positions().collect();
        positions
            .into_iter()
            .map(|pos| self.spawn_at(grid, pos, rng))
            .collect()
    }

    /// Compact every column toward row 0, keeping relative order.
    ///
    /// Two-pointer scan per column; only tiles that actually moved are reported.
    pub fn move_down(&self, grid: &mut Grid) -> Vec<Move> {
        let mut moves = Vec::new();
        for c in 0..grid.cols() {
            let mut write = 0usize;
            for r in 0..grid.rows() {
                let from = CellPos::new(r, c);
                if !grid.is_occupied(from) {
                    continue;
                }
                if r != write {
                    let to = CellPos::new(write, c);
                    let tile = grid.take(from);
                    grid.set(to, tile);
                    moves.push(Move { from, to });
                }
                write += 1;
            }
        }
        moves
    }

    /// Spawn a random tile into every empty cell
    pub fn fill_empty<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Vec<Spawned> {
        let empty: Vec<CellPos> = grid.positions().filter(|&pos| !grid.is_occupied(pos)).collect();
        empty
            .into_iter()
            .map(|pos| self.spawn_at(grid, pos, rng))
            .collect()
    }

    /// Fisher-Yates permutation of the occupied cells' tiles.
    ///
    /// The set of occupied positions is unchanged; empty cells stay empty.
    /// Returns one move per relocated tile.
    pub fn shuffle_tiles<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Vec<Move> {
        let (positions, tiles): (Vec<CellPos>, Vec<Tile>) =
            grid.occupied().map(|(pos, tile)| (pos, *tile)).unzip();

        let mut order: Vec<usize> = (0..positions.len()).collect();
        for i in (1..order.len()).rev() {
            let j = rng.random_range(0..=i);
            order.swap(i, j);
        }

        let mut moves = Vec::new();
        for (slot, &src) in order.iter().enumerate() {
            grid.set(positions[slot], Some(tiles[src]));
            if src != slot {
                moves.push(Move {
                    from: positions[src],
                    to: positions[slot],
                });
            }
        }
        moves
    }

    fn spawn_at<R: Rng + ?Sized>(&self, grid: &mut Grid, pos: CellPos, rng: &mut R) -> Spawned {
        let id = self.random_id(rng);
        grid.set(pos, Some(Tile::normal(id)));
        Spawned { pos, id }
    }
}
