//! The player: feeds observations into its knowledge base and picks the next
//! cell to reveal.

use crate::error::Result;
use crate::knowledge::{InferenceSummary, KnowledgeBase};
use crate::rng::AgentRng;
use crate::sentence::Sentence;
use crate::types::Cell;
use serde::Serialize;
use std::collections::BTreeSet;

pub struct Agent {
    knowledge: KnowledgeBase,
    rng: AgentRng,
}

/// How a move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveKind {
    /// Proven safe.
    Safe,
    /// A guess.
    Random,
}

/// Everything the agent knows, in a form that serializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSnapshot {
    pub height: usize,
    pub width: usize,
    pub moves_made: Vec<Cell>,
    pub safes: Vec<Cell>,
    pub mines: Vec<Cell>,
    pub sentences: Vec<Sentence>,
}

impl Agent {
    pub fn new(height: usize, width: usize, rng: AgentRng) -> Self {
        Self {
            knowledge: KnowledgeBase::new(height, width),
            rng,
        }
    }

    pub fn with_seed(height: usize, width: usize, seed: u64) -> Self {
        Self::new(height, width, AgentRng::from_seed(seed))
    }

    /// See [`KnowledgeBase::add_knowledge`].
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<InferenceSummary> {
        self.knowledge.add_knowledge(cell, count)
    }

    /// A cell proven safe that hasn't been revealed yet, lowest first.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.knowledge
            .safes()
            .difference(self.knowledge.moves_made())
            .next()
            .copied()
    }

    /// A uniformly random cell that is neither revealed nor a proven mine.
    pub fn make_random_move(&mut self) -> Option<Cell> {
        let kb = &self.knowledge;
        let candidates: Vec<Cell> = kb
            .neighbors()
            .cells()
            .filter(|c| !kb.moves_made().contains(c) && !kb.mines().contains(c))
            .collect();
        self.rng.choose(&candidates)
    }

    /// Safe move if there is one, random otherwise.
    pub fn next_move(&mut self) -> Option<(Cell, MoveKind)> {
        if let Some(cell) = self.make_safe_move() {
            return Some((cell, MoveKind::Safe));
        }
        self.make_random_move().map(|cell| (cell, MoveKind::Random))
    }

    pub fn height(&self) -> usize {
        self.knowledge.height()
    }

    pub fn width(&self) -> usize {
        self.knowledge.width()
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        self.knowledge.safes()
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        self.knowledge.mines()
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        self.knowledge.moves_made()
    }

    pub fn sentences(&self) -> &[Sentence] {
        self.knowledge.sentences()
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            height: self.height(),
            width: self.width(),
            moves_made: self.moves_made().iter().copied().collect(),
            safes: self.safes().iter().copied().collect(),
            mines: self.mines().iter().copied().collect(),
            sentences: self.sentences().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::error::KnowledgeError;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn test_no_safe_move_at_start() {
        let agent = Agent::with_seed(4, 4, 0);
        assert_eq!(agent.make_safe_move(), None);
    }

    #[test]
    fn test_safe_move_is_unrevealed_safe() {
        let mut agent = Agent::with_seed(3, 3, 0);
        agent.add_knowledge(c(2, 2), 0).unwrap();

        let before = agent.snapshot();
        let cell = agent.make_safe_move().unwrap();
        assert!(agent.safes().contains(&cell));
        assert!(!agent.moves_made().contains(&cell));
        assert_eq!(cell, c(1, 1));
        // Choosing a safe move changes nothing.
        assert_eq!(agent.snapshot(), before);
    }

    #[test]
    fn test_safe_moves_run_out() {
        let mut agent = Agent::with_seed(1, 2, 0);
        agent.add_knowledge(c(0, 0), 0).unwrap();
        assert_eq!(agent.make_safe_move(), Some(c(0, 1)));
        agent.add_knowledge(c(0, 1), 0).unwrap();
        assert_eq!(agent.make_safe_move(), None);
    }

    #[test]
    fn test_random_move_avoids_revealed_and_mines() {
        let mut agent = Agent::with_seed(3, 3, 11);
        agent.add_knowledge(c(0, 0), 3).unwrap();
        for _ in 0..100 {
            let cell = agent.make_random_move().unwrap();
            assert!(cell.row < 3 && cell.col < 3);
            assert_ne!(cell, c(0, 0));
            assert!(!agent.mines().contains(&cell));
        }
    }

    #[test]
    fn test_random_move_is_seeded() {
        let mut a = Agent::with_seed(8, 8, 5);
        let mut b = Agent::with_seed(8, 8, 5);
        for _ in 0..20 {
            assert_eq!(a.make_random_move(), b.make_random_move());
        }
    }

    #[test]
    fn test_random_move_covers_grid() {
        let mut agent = Agent::with_seed(2, 2, 3);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(agent.make_random_move().unwrap());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_random_move_exhausted() {
        // One mine at (0,0) on a 2x2 board; open the rest.
        let mut agent = Agent::with_seed(2, 2, 0);
        agent.add_knowledge(c(1, 1), 1).unwrap();
        agent.add_knowledge(c(0, 1), 1).unwrap();
        agent.add_knowledge(c(1, 0), 1).unwrap();
        assert!(agent.mines().contains(&c(0, 0)));
        assert_eq!(agent.make_random_move(), None);
        assert_eq!(agent.next_move(), None);
    }

    #[test]
    fn test_next_move_prefers_safe() {
        // Mine in the far corner; every answer comes from the real board.
        let board = Board::from_mines(3, 3, [c(2, 2)]);
        let mut agent = Agent::with_seed(3, 3, 0);
        agent.add_knowledge(c(0, 0), 0).unwrap();
        for _ in 0..7 {
            let (cell, kind) = agent.next_move().unwrap();
            assert_eq!(kind, MoveKind::Safe);
            assert!(agent.safes().contains(&cell));
            assert!(!agent.moves_made().contains(&cell));
            assert!(!board.is_mine(cell));
            agent.add_knowledge(cell, board.neighbor_mine_count(cell)).unwrap();
        }
        assert_eq!(agent.moves_made().len(), 8);
        assert!(agent.mines().contains(&c(2, 2)));
        assert_eq!(agent.next_move(), None);
    }

    #[test]
    fn test_next_move_guesses_without_safe_cells() {
        let mut agent = Agent::with_seed(3, 3, 4);
        let (cell, kind) = agent.next_move().unwrap();
        assert_eq!(kind, MoveKind::Random);
        assert!(cell.row < 3 && cell.col < 3);
    }

    #[test]
    fn test_rejected_observation_surfaces() {
        let mut agent = Agent::with_seed(3, 3, 0);
        agent.add_knowledge(c(1, 1), 2).unwrap();
        assert_eq!(
            agent.add_knowledge(c(1, 1), 2),
            Err(KnowledgeError::AlreadyRevealed(c(1, 1)))
        );
    }

    #[test]
    fn test_snapshot() {
        let mut agent = Agent::with_seed(3, 3, 0);
        agent.add_knowledge(c(1, 1), 1).unwrap();
        let snap = agent.snapshot();
        assert_eq!((snap.height, snap.width), (3, 3));
        assert_eq!(snap.moves_made, vec![c(1, 1)]);
        assert_eq!(snap.safes, vec![c(1, 1)]);
        assert!(snap.mines.is_empty());
        assert_eq!(snap.sentences.len(), 1);
    }
}
