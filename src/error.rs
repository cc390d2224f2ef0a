//! Error types for the knowledge base and configuration layers.

use crate::types::Cell;
use thiserror::Error;

/// Errors raised while feeding observations into the knowledge base.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("cell {cell} is outside the {height}x{width} grid")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {0} has already been revealed")]
    AlreadyRevealed(Cell),

    #[error("cell {0} is a proven mine and cannot be revealed")]
    RevealedMine(Cell),

    #[error("cell {cell} reports {count} adjacent mines but has only {neighbors} neighbors")]
    CountTooLarge {
        cell: Cell,
        count: usize,
        neighbors: usize,
    },

    /// The observations seen so far cannot all be true.
    #[error("contradictory knowledge: {0}")]
    Contradiction(String),
}

/// Errors raised when validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions {height}x{width} are invalid")]
    Dimensions { height: usize, width: usize },

    #[error("{mines} mines do not fit on a board of {cells} cells")]
    TooManyMines { mines: usize, cells: usize },
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;
