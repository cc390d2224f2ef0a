//! Core data types shared by the board and the agent.
//!
//! Grids use flat `Vec` storage in row-major layout:
//! `cells[row * width + col]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(row, col)` position on the board.
///
/// Ordering is row-major, which is what gives the agent its deterministic
/// iteration order over cell sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Mine positions for each cell.
/// Uses `Vec<u8>` (0/1) instead of `Vec<bool>` for simpler WASM interop.
#[derive(Clone, Debug)]
pub struct MineGrid {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<u8>,
}

impl MineGrid {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![0; height * width],
        }
    }

    #[inline(always)]
    pub fn get(&self, cell: Cell) -> bool {
        self.cells[cell.row * self.width + cell.col] != 0
    }

    #[inline(always)]
    pub fn set(&mut self, cell: Cell, val: bool) {
        self.cells[cell.row * self.width + cell.col] = val as u8;
    }

    #[inline(always)]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Count total mines on the board.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to grid bounds) for every cell,
/// in row-major order. Indexed by `row * width + col`.
#[derive(Debug)]
pub struct NeighborCache {
    pub height: usize,
    pub width: usize,
    /// Flat storage of all neighbors.
    data: Vec<Cell>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbor cache for a grid of the given dimensions.
    pub fn new(height: usize, width: usize) -> Self {
        let total = height * width;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 {
                            data.push(Cell::new(nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            height,
            width,
            data,
            offsets,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Get the pre-computed neighbors of `cell`. The cell must be in bounds.
    #[inline(always)]
    pub fn get(&self, cell: Cell) -> &[Cell] {
        let idx = cell.row * self.width + cell.col;
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.data[start..end]
    }

    /// Iterate every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }
}
