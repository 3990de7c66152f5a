//! Grid module - the board's cell storage
//!
//! The grid is a `rows x cols` matrix where each cell is empty or holds one tile.
//! Uses a flat row-major vector for cache locality; dimensions are fixed at construction.
//! Coordinates: `CellPos { r, c }` with `r` in `0..rows` (row 0 is the bottom)
//! and `c` in `0..cols`.
//!
//! The grid knows nothing about matching rules. Out-of-range reads return `None`,
//! out-of-range writes are refused; callers are expected to validate first.

use arrayvec::ArrayVec;

use crate::types::{Cell, CellPos, Tile, TileId};

/// The game board - flat storage of `rows * cols` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Flat array of cells, row-major order (r * cols + c)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Build a grid from rows of cells, `rows[0]` being board row 0.
    ///
    /// Returns `None` for an empty or ragged matrix.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let height = rows.len();
        Some(Self {
            rows: height,
            cols: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Calculate flat index from a position
    #[inline(always)]
    pub fn index_of(&self, pos: CellPos) -> Option<usize> {
        if pos.r >= self.rows || pos.c >= self.cols {
            return None;
        }
        Some(pos.r * self.cols + pos.c)
    }

    #[inline]
    fn pos_of(&self, idx: usize) -> CellPos {
        CellPos::new(idx / self.cols, idx % self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (occupied or not)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.index_of(pos).is_some()
    }

    /// Tile at `pos`; `None` if empty or out of bounds
    pub fn get(&self, pos: CellPos) -> Option<&Tile> {
        self.index_of(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Set the cell at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: CellPos, cell: Cell) -> bool {
        match self.index_of(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Remove and return the tile at `pos`
    pub fn take(&mut self, pos: CellPos) -> Cell {
        self.index_of(pos).and_then(|idx| self.cells[idx].take())
    }

    /// Exchange two cells' contents. Both positions must be in bounds.
    pub fn swap(&mut self, a: CellPos, b: CellPos) {
        if let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) {
            self.cells.swap(ia, ib);
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, pos: CellPos) -> bool {
        self.get(pos).is_some()
    }

    pub fn tile_id(&self, pos: CellPos) -> Option<TileId> {
        self.get(pos).map(|tile| tile.id)
    }

    /// In-bounds orthogonal neighbours (down, up, left, right)
    pub fn neighbors(&self, pos: CellPos) -> ArrayVec<CellPos, 4> {
        let mut out = ArrayVec::new();
        if pos.r > 0 {
            out.push(CellPos::new(pos.r - 1, pos.c));
        }
        if pos.r + 1 < self.rows {
            out.push(CellPos::new(pos.r + 1, pos.c));
        }
        if pos.c > 0 {
            out.push(CellPos::new(pos.r, pos.c - 1));
        }
        if pos.c + 1 < self.cols {
            out.push(CellPos::new(pos.r, pos.c + 1));
        }
        out
    }

    /// All positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        (0..self.cells.len()).map(|idx| self.pos_of(idx))
    }

    /// Occupied positions with their tiles, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (CellPos, &Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.as_ref().map(|tile| (self.pos_of(idx), tile)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Tile ids as a matrix (`ids()[r][c]`), for display and assertions
    pub fn ids(&self) -> Vec<Vec<Option<TileId>>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|cell| cell.map(|tile| tile.id)).collect())
            .collect()
    }
}
