//! Game configuration.
//!
//! Deserialized from a plain JS object on the WASM side; every field is
//! optional and falls back to the classic 8×8 board with 8 mines.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Largest supported side length.
pub const MAX_DIMENSION: usize = 0xFFFF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Seed shared by mine placement and the agent's guesses.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height == 0
            || self.width == 0
            || self.height > MAX_DIMENSION
            || self.width > MAX_DIMENSION
        {
            return Err(ConfigError::Dimensions {
                height: self.height,
                width: self.width,
            });
        }
        let cells = self.height * self.width;
        if self.mines >= cells {
            return Err(ConfigError::TooManyMines {
                mines: self.mines,
                cells,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert_eq!((config.height, config.width, config.mines), (8, 8, 8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GameConfig { height: 0, ..GameConfig::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Dimensions { height: 0, width: 8 })
        );
    }

    #[test]
    fn test_rejects_full_board_of_mines() {
        let config = GameConfig { height: 3, width: 3, mines: 9, seed: None };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyMines { mines: 9, cells: 9 })
        );
    }
}
