//! The board: mine placement and the two queries the agent's environment
//! answers, "is this a mine?" and "how many mines are adjacent?".
//!
//! The agent never reads the board directly; the game driver relays
//! neighbor counts to it.

use crate::error::ConfigError;
use crate::rng::AgentRng;
use crate::types::{Cell, MineGrid, NeighborCache};
use std::collections::BTreeSet;
use std::fmt;

pub struct Board {
    mines: MineGrid,
    neighbors: NeighborCache,
    /// Cells the player has flagged as mines.
    flagged: BTreeSet<Cell>,
}

impl Board {
    /// Place `mine_count` mines uniformly at random.
    ///
    /// `mine_count` is clamped to the number of cells.
    pub fn random(height: usize, width: usize, mine_count: usize, rng: &mut AgentRng) -> Self {
        let mut mines = MineGrid::new(height, width);
        let target = mine_count.min(height * width);
        let mut placed = 0;

        while placed < target {
            let cell = Cell::new(rng.gen_range(height), rng.gen_range(width));
            if !mines.get(cell) {
                mines.set(cell, true);
                placed += 1;
            }
        }

        Self::with_mines(mines)
    }

    /// Deterministic placement. Out-of-bounds cells are ignored.
    pub fn from_mines(height: usize, width: usize, cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut mines = MineGrid::new(height, width);
        for cell in cells {
            if mines.in_bounds(cell) {
                mines.set(cell, true);
            }
        }
        Self::with_mines(mines)
    }

    fn with_mines(mines: MineGrid) -> Self {
        Self {
            neighbors: NeighborCache::new(mines.height, mines.width),
            mines,
            flagged: BTreeSet::new(),
        }
    }

    /// `(height, width)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.mines.height, self.mines.width)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.mines.in_bounds(cell)
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.in_bounds(cell) && self.mines.get(cell)
    }

    /// Number of mines among the (up to 8) neighbors of `cell`, not counting
    /// the cell itself.
    pub fn neighbor_mine_count(&self, cell: Cell) -> usize {
        if !self.in_bounds(cell) {
            return 0;
        }
        self.neighbors
            .get(cell)
            .iter()
            .filter(|&&n| self.mines.get(n))
            .count()
    }

    pub fn mine_count(&self) -> usize {
        self.mines.count()
    }

    pub fn mine_grid(&self) -> &MineGrid {
        &self.mines
    }

    /// Record a flag on `cell`.
    pub fn flag(&mut self, cell: Cell) {
        if self.in_bounds(cell) {
            self.flagged.insert(cell);
        }
    }

    pub fn flagged(&self) -> &BTreeSet<Cell> {
        &self.flagged
    }

    /// True once the flagged cells are exactly the mines.
    pub fn won(&self) -> bool {
        self.flagged.len() == self.mine_count() && self.flagged.iter().all(|&c| self.mines.get(c))
    }
}

/// Calculate the neighbor mine count for every cell, `-1` on mine cells.
///
/// Row-major, `out[row * width + col]`.
pub fn calculate_numbers(mines: &MineGrid, neighbor_cache: &NeighborCache) -> Vec<i8> {
    let mut out = vec![0i8; mines.height * mines.width];

    for cell in neighbor_cache.cells() {
        let idx = cell.row * mines.width + cell.col;
        if mines.get(cell) {
            out[idx] = -1;
            continue;
        }
        out[idx] = neighbor_cache
            .get(cell)
            .iter()
            .filter(|&&n| mines.get(n))
            .count() as i8;
    }

    out
}

/// [`calculate_numbers`] over a flat row-major 0/1 mine grid.
///
/// Fails when `height * width` overflows or doesn't match the grid length.
pub fn neighbor_counts(height: usize, width: usize, mines_flat: &[u8]) -> Result<Vec<i8>, ConfigError> {
    match height.checked_mul(width) {
        Some(total) if total == mines_flat.len() => {}
        _ => return Err(ConfigError::Dimensions { height, width }),
    }
    let mines = MineGrid { height, width, cells: mines_flat.to_vec() };
    Ok(calculate_numbers(&mines, &NeighborCache::new(height, width)))
}

/// Text view of where the mines are.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (height, width) = self.dimensions();
        let rule = format!("{}-", "--".repeat(width));
        for row in 0..height {
            writeln!(f, "{rule}")?;
            for col in 0..width {
                let mark = if self.mines.get(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_mine_count() {
        let mut rng = AgentRng::from_seed(42);
        let board = Board::random(16, 30, 99, &mut rng);
        assert_eq!(board.mine_count(), 99);
        assert_eq!(board.dimensions(), (16, 30));
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Board::random(8, 8, 10, &mut AgentRng::from_seed(9));
        let b = Board::random(8, 8, 10, &mut AgentRng::from_seed(9));
        assert_eq!(a.mine_grid().cells, b.mine_grid().cells);
    }

    #[test]
    fn test_random_clamps_count() {
        let mut rng = AgentRng::from_seed(1);
        let board = Board::random(2, 2, 10, &mut rng);
        assert_eq!(board.mine_count(), 4);
    }

    #[test]
    fn test_neighbor_count_center_mine() {
        let board = Board::from_mines(3, 3, [Cell::new(1, 1)]);
        for cell in [
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 0),
            Cell::new(1, 2),
            Cell::new(2, 0),
            Cell::new(2, 1),
            Cell::new(2, 2),
        ] {
            assert_eq!(board.neighbor_mine_count(cell), 1);
        }
        // A cell doesn't count itself.
        assert_eq!(board.neighbor_mine_count(Cell::new(1, 1)), 0);
    }

    #[test]
    fn test_neighbor_count_corner_mine() {
        let board = Board::from_mines(3, 3, [Cell::new(0, 0)]);
        assert!(board.is_mine(Cell::new(0, 0)));
        assert_eq!(board.neighbor_mine_count(Cell::new(1, 1)), 1);
        assert_eq!(board.neighbor_mine_count(Cell::new(0, 1)), 1);
        assert_eq!(board.neighbor_mine_count(Cell::new(2, 2)), 0);
        assert_eq!(board.neighbor_mine_count(Cell::new(2, 0)), 0);
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let board = Board::from_mines(3, 3, [Cell::new(0, 0), Cell::new(7, 7)]);
        assert_eq!(board.mine_count(), 1);
        assert!(!board.is_mine(Cell::new(7, 7)));
        assert_eq!(board.neighbor_mine_count(Cell::new(3, 3)), 0);
    }

    #[test]
    fn test_won_requires_exact_flags() {
        let mut board = Board::from_mines(3, 3, [Cell::new(0, 0), Cell::new(2, 2)]);
        assert!(!board.won());
        board.flag(Cell::new(0, 0));
        assert!(!board.won());
        board.flag(Cell::new(2, 2));
        assert!(board.won());
        assert_eq!(board.flagged(), &BTreeSet::from([Cell::new(0, 0), Cell::new(2, 2)]));
        board.flag(Cell::new(1, 1));
        assert!(!board.won());
        // Off-board flags are dropped.
        board.flag(Cell::new(5, 5));
        assert_eq!(board.flagged().len(), 3);
    }

    #[test]
    fn test_calculate_numbers() {
        let board = Board::from_mines(2, 3, [Cell::new(0, 0)]);
        let nc = NeighborCache::new(2, 3);
        let numbers = calculate_numbers(board.mine_grid(), &nc);
        assert_eq!(numbers, vec![-1, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_neighbor_counts_flat() {
        assert_eq!(neighbor_counts(2, 3, &[1, 0, 0, 0, 0, 0]).unwrap(), vec![-1, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_neighbor_counts_rejects_bad_dimensions() {
        assert_eq!(
            neighbor_counts(2, 3, &[0; 5]),
            Err(ConfigError::Dimensions { height: 2, width: 3 })
        );
        // height * width wraps around.
        assert_eq!(
            neighbor_counts(usize::MAX, 2, &[0; 2]),
            Err(ConfigError::Dimensions { height: usize::MAX, width: 2 })
        );
    }

    #[test]
    fn test_display() {
        let board = Board::from_mines(1, 2, [Cell::new(0, 1)]);
        assert_eq!(board.to_string(), "-----\n| |X|\n-----\n");
    }
}
