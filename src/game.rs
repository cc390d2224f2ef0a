//! Autonomous play: an agent against a generated board.
//!
//! Strategy is the agent's own: a proven-safe cell if one exists, a random
//! unrevealed non-mine cell otherwise.

use crate::agent::{Agent, MoveKind};
use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{ConfigError, KnowledgeError};
use crate::rng::AgentRng;
use crate::types::Cell;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error("agent plays a {agent_height}x{agent_width} grid but the board is {board_height}x{board_width}")]
    DimensionMismatch {
        agent_height: usize,
        agent_width: usize,
        board_height: usize,
        board_width: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
    /// No move left but the game isn't won.
    Stuck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub outcome: Outcome,
    pub moves: usize,
    pub safe_moves: usize,
    pub random_moves: usize,
    pub mines_found: usize,
    /// The mine that ended the game, if any.
    pub exploded: Option<Cell>,
}

/// Generate a board from `config` and let a fresh agent play it.
pub fn play(config: &GameConfig) -> Result<GameReport, GameError> {
    config.validate()?;
    let mut rng = AgentRng::from_optional_seed(config.seed);
    let mut board = Board::random(config.height, config.width, config.mines, &mut rng);
    let agent = Agent::new(config.height, config.width, rng);
    play_board(&mut board, agent)
}

/// Let `agent` play `board` until it wins, hits a mine or runs out of moves.
pub fn play_board(board: &mut Board, mut agent: Agent) -> Result<GameReport, GameError> {
    let (height, width) = board.dimensions();
    if (agent.height(), agent.width()) != (height, width) {
        return Err(GameError::DimensionMismatch {
            agent_height: agent.height(),
            agent_width: agent.width(),
            board_height: height,
            board_width: width,
        });
    }
    let safe_cells = height * width - board.mine_count();
    let mut report = GameReport {
        outcome: Outcome::Stuck,
        moves: 0,
        safe_moves: 0,
        random_moves: 0,
        mines_found: 0,
        exploded: None,
    };

    loop {
        if board.won() || agent.moves_made().len() == safe_cells {
            report.outcome = Outcome::Won;
            break;
        }

        let Some((cell, kind)) = agent.next_move() else {
            break;
        };
        report.moves += 1;
        match kind {
            MoveKind::Safe => report.safe_moves += 1,
            MoveKind::Random => report.random_moves += 1,
        }
        debug!(%cell, ?kind, "move");

        if board.is_mine(cell) {
            report.outcome = Outcome::Lost;
            report.exploded = Some(cell);
            break;
        }

        agent.add_knowledge(cell, board.neighbor_mine_count(cell))?;
        for &mine in agent.mines() {
            board.flag(mine);
        }
    }

    report.mines_found = agent.mines().len();
    info!(
        outcome = ?report.outcome,
        moves = report.moves,
        random_moves = report.random_moves,
        mines_found = report.mines_found,
        "game over"
    );
    Ok(report)
}
