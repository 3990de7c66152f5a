//! Tile variants - per-kind affected sets
//!
//! The affected set of a tile is the set of positions its activation would
//! destroy. It is computed on demand from the tile's kind and the current grid,
//! never contains empty cells, and contains the seed whenever the seed is occupied.

use crate::grid::Grid;
use crate::types::{CellPos, Tile, TileKind};

/// Affected set of whatever tile sits at `pos` (empty if the cell is empty)
pub fn affected(grid: &Grid, pos: CellPos) -> Vec<CellPos> {
    match grid.get(pos) {
        Some(tile) => affected_by(tile, grid, pos),
        None => Vec::new(),
    }
}

/// Affected set of `tile` as if it sat at `pos`
pub fn affected_by(tile: &Tile, grid: &Grid, pos: CellPos) -> Vec<CellPos> {
    if !grid.contains(pos) {
        return Vec::new();
    }
    match tile.kind {
        TileKind::Normal => connected_group(grid, pos),
        TileKind::Bomb { radius } => square_area(grid, pos, radius as usize),
        TileKind::RocketRow => (0..grid.cols())
            .map(|c| CellPos::new(pos.r, c))
            .filter(|&p| grid.is_occupied(p))
            .collect(),
        TileKind::RocketCol => (0..grid.rows())
            .map(|r| CellPos::new(r, pos.c))
            .filter(|&p| grid.is_occupied(p))
            .collect(),
    }
}

/// Maximal 4-connected region of occupied cells sharing the seed's id.
///
/// Iterative depth-first fill with a visited bitmap: every cell is pushed at
/// most once, so the result has no duplicates and the stack stays bounded by
/// the board size.
pub fn connected_group(grid: &Grid, seed: CellPos) -> Vec<CellPos> {
    let (Some(seed_idx), Some(id)) = (grid.index_of(seed), grid.tile_id(seed)) else {
        return Vec::new();
    };

    let mut visited = vec![false; grid.len()];
    visited[seed_idx] = true;
    let mut stack = vec![seed];
    let mut group = Vec::new();

    while let Some(pos) = stack.pop() {
        group.push(pos);
        for next in grid.neighbors(pos) {
            let Some(idx) = grid.index_of(next) else {
                continue;
            };
            if !visited[idx] && grid.tile_id(next) == Some(id) {
                visited[idx] = true;
                stack.push(next);
            }
        }
    }

    group
}

/// Occupied cells of the square of `radius` around `center`, clamped to the board
fn square_area(grid: &Grid, center: CellPos, radius: usize) -> Vec<CellPos> {
    let r0 = center.r.saturating_sub(radius);
    let r1 = (center.r + radius).min(grid.rows() - 1);
    let c0 = center.c.saturating_sub(radius);
    let c1 = (center.c + radius).min(grid.cols() - 1);

    let mut out = Vec::with_capacity((r1 - r0 + 1) * (c1 - c0 + 1));
    for r in r0..=r1 {
        for c in c0..=c1 {
            let pos = CellPos::new(r, c);
            if grid.is_occupied(pos) {
                out.push(pos);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: usize, cols: usize, id: u32) -> Grid {
        let mut grid = Grid::new(rows, cols);
        for pos in grid.positions().collect::<Vec<_>>() {
            grid.set(pos, Some(Tile::normal(id)));
        }
        grid
    }

    #[test]
    fn test_empty_cell_has_no_affected_set() {
        let grid = Grid::new(2, 2);
        assert!(affected(&grid, CellPos::new(0, 0)).is_empty());
    }

    #[test]
    fn test_normal_group_stops_at_gaps() {
        let mut grid = filled(1, 5, 3);
        grid.set(CellPos::new(0, 2), None);
        let mut group = affected(&grid, CellPos::new(0, 0));
        group.sort();
        assert_eq!(group, vec![CellPos::new(0, 0), CellPos::new(0, 1)]);
    }

    #[test]
    fn test_bomb_radius_zero_hits_only_itself() {
        let mut grid = filled(3, 3, 1);
        let bomb = Tile::new(9, TileKind::Bomb { radius: 0 });
        grid.set(CellPos::new(1, 1), Some(bomb));
        assert_eq!(affected(&grid, CellPos::new(1, 1)), vec![CellPos::new(1, 1)]);
    }

    #[test]
    fn test_rocket_skips_empty_cells() {
        let mut grid = filled(3, 3, 1);
        grid.set(CellPos::new(0, 1), Some(Tile::new(9, TileKind::RocketRow)));
        grid.set(CellPos::new(0, 2), None);
        assert_eq!(
            affected(&grid, CellPos::new(0, 1)),
            vec![CellPos::new(0, 0), CellPos::new(0, 1)]
        );
    }
}
