//! Knowledge-based Minesweeper agent.
//!
//! The agent learns from "this cell has N mines around it" observations and
//! deduces, with certainty, which cells are safe and which are mines. It holds
//! its knowledge as [`Sentence`]s and applies direct and subset inference to a
//! fixpoint after every observation. When nothing is provably safe it guesses
//! uniformly among the remaining candidates with an injectable, seedable RNG.
//!
//! The same API is exported to JavaScript via wasm-bindgen when compiled for
//! `wasm32`. Flat grids crossing that boundary are row-major:
//! `cells[row * width + col]`.

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod rng;
pub mod sentence;
pub mod types;

pub use agent::{Agent, AgentSnapshot, MoveKind};
pub use board::Board;
pub use config::GameConfig;
pub use error::{ConfigError, KnowledgeError};
pub use game::{play, GameReport, Outcome};
pub use knowledge::{InferenceSummary, KnowledgeBase};
pub use rng::AgentRng;
pub use sentence::Sentence;
pub use types::Cell;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::types::Cell;
    use crate::{board, game, Agent, AgentRng, GameConfig};

    /// JS handle around an [`Agent`].
    #[wasm_bindgen(js_name = "Agent")]
    pub struct WasmAgent {
        inner: Agent,
    }

    #[wasm_bindgen(js_class = "Agent")]
    impl WasmAgent {
        /// `new Agent(height, width, seed?)`. Omit the seed for a random one.
        #[wasm_bindgen(constructor)]
        pub fn new(height: usize, width: usize, seed: Option<u64>) -> Result<WasmAgent, JsError> {
            let config = GameConfig { height, width, mines: 0, seed };
            config.validate()?;
            Ok(WasmAgent {
                inner: Agent::new(height, width, AgentRng::from_optional_seed(seed)),
            })
        }

        /// Feed one observation. Returns `{ new_safes, new_mines, derived_sentences }`.
        #[wasm_bindgen(js_name = "addKnowledge")]
        pub fn add_knowledge(&mut self, row: usize, col: usize, count: usize) -> Result<JsValue, JsError> {
            let summary = self.inner.add_knowledge(Cell::new(row, col), count)?;
            Ok(serde_wasm_bindgen::to_value(&summary)?)
        }

        /// `{ row, col }` of a proven-safe unrevealed cell, or `null`.
        #[wasm_bindgen(js_name = "makeSafeMove")]
        pub fn make_safe_move(&self) -> Result<JsValue, JsError> {
            cell_or_null(self.inner.make_safe_move())
        }

        /// `{ row, col }` of a random candidate cell, or `null`.
        #[wasm_bindgen(js_name = "makeRandomMove")]
        pub fn make_random_move(&mut self) -> Result<JsValue, JsError> {
            cell_or_null(self.inner.make_random_move())
        }

        /// `{ height, width, moves_made, safes, mines, sentences }`.
        #[wasm_bindgen(js_name = "snapshot")]
        pub fn snapshot(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
        }
    }

    fn cell_or_null(cell: Option<Cell>) -> Result<JsValue, JsError> {
        match cell {
            Some(cell) => Ok(serde_wasm_bindgen::to_value(&cell)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Play a full game. `config` is `{ height?, width?, mines?, seed? }`.
    /// Returns the game report object.
    #[wasm_bindgen(js_name = "playGame")]
    pub fn wasm_play_game(config: JsValue) -> Result<JsValue, JsError> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let report = game::play(&config)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    /// Calculate neighbor mine counts for all cells (`-1` on mines).
    #[wasm_bindgen(js_name = "neighborCounts")]
    pub fn wasm_neighbor_counts(
        height: usize,
        width: usize,
        mines_flat: &[u8],
    ) -> Result<js_sys::Int8Array, JsError> {
        let numbers = board::neighbor_counts(height, width, mines_flat)?;

        let arr = js_sys::Int8Array::new_with_length(numbers.len() as u32);
        arr.copy_from(&numbers);
        Ok(arr)
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM agent ready".to_string()
    }
}
