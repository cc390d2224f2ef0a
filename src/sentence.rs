//! A logical statement about the board: exactly `count` of `cells` are mines.

use crate::error::KnowledgeError;
use crate::types::Cell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// `count` of the cells in `cells` are mines.
///
/// Cells are kept in a `BTreeSet`, so two sentences over the same cells compare
/// and hash equal regardless of insertion order. That is what the subset rule
/// relies on to recognise sentences it has already derived.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Returns `None` if `count` exceeds the number of cells.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Option<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        (count <= cells.len()).then_some(Self { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Every cell, if all of them must be mines.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.cells.len() == self.count {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell, if none of them can be a mine.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Returns `false` if the cell was present but the sentence had no mines
    /// left to give, which means the knowledge is contradictory. The sentence
    /// is left unchanged in that case.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if !self.cells.contains(&cell) {
            return true;
        }
        if self.count == 0 {
            return false;
        }
        self.cells.remove(&cell);
        self.count -= 1;
        true
    }

    /// Returns `false` if removing the cell would leave more mines than cells.
    /// The sentence is left unchanged in that case.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        if !self.cells.contains(&cell) {
            return true;
        }
        if self.count == self.cells.len() {
            return false;
        }
        self.cells.remove(&cell);
        true
    }

    /// If `self` is a subset of `other`, the sentence over the cells only
    /// `other` has. `Ok(None)` when not a subset or when nothing is left over.
    /// Fails when the counts make the pair unsatisfiable.
    pub fn subtract_from(&self, other: &Sentence) -> Result<Option<Sentence>, KnowledgeError> {
        if !self.cells.is_subset(&other.cells) {
            return Ok(None);
        }
        let cells: BTreeSet<Cell> = other.cells.difference(&self.cells).copied().collect();
        let unsatisfiable = || KnowledgeError::Contradiction(format!("{self} within {other}"));
        let count = other.count.checked_sub(self.count).ok_or_else(unsatisfiable)?;
        if cells.is_empty() {
            return if count == 0 { Ok(None) } else { Err(unsatisfiable()) };
        }
        if count > cells.len() {
            return Err(unsatisfiable());
        }
        Ok(Some(Sentence { cells, count }))
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.count <= self.cells.len()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "}} = {}", self.count)
    }
}
