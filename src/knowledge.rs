//! Knowledge base: everything the agent has learned about the board.
//!
//! Knowledge is held as a list of [`Sentence`]s plus three cell sets: cells
//! already revealed, cells proven safe and cells proven mines. Two rules turn
//! sentences into new knowledge:
//!
//! - Direct inference: a sentence with `count == 0` makes all its cells safe,
//!   one with `count == len` makes all its cells mines.
//! - Subset inference: if `A ⊆ B` then `B − A` holds `B.count − A.count` mines.
//!
//! Every resolved cell is removed from every sentence, so a sentence only ever
//! mentions undetermined cells. [`KnowledgeBase::infer`] interleaves both rules
//! until neither produces anything new.

use crate::error::{KnowledgeError, Result};
use crate::sentence::Sentence;
use crate::types::{Cell, NeighborCache};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace, warn};

/// What one round of inference produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferenceSummary {
    pub new_safes: usize,
    pub new_mines: usize,
    pub derived_sentences: usize,
}

impl InferenceSummary {
    pub fn is_empty(&self) -> bool {
        self.new_safes == 0 && self.new_mines == 0 && self.derived_sentences == 0
    }
}

#[derive(Debug)]
pub struct KnowledgeBase {
    neighbors: NeighborCache,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    sentences: Vec<Sentence>,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            neighbors: NeighborCache::new(height, width),
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            sentences: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.neighbors.height
    }

    pub fn width(&self) -> usize {
        self.neighbors.width
    }

    pub fn neighbors(&self) -> &NeighborCache {
        &self.neighbors
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Record that `cell` was revealed safely and has `count` mines around it.
    ///
    /// Input errors are reported before any state changes. A contradiction
    /// found later, during inference, leaves the base partially updated; that
    /// can only happen if the observations fed in were not all true.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<InferenceSummary> {
        let (undetermined, known_mines) = self.check_observation(cell, count).map_err(|err| {
            warn!(%cell, count, error = %err, "observation rejected");
            err
        })?;
        let adjusted = count - known_mines;
        debug!(
            %cell,
            count,
            adjusted,
            undetermined = undetermined.len(),
            "adding knowledge"
        );

        self.moves_made.insert(cell);
        let mut summary = InferenceSummary::default();
        if self.mark_safe(cell)? {
            summary.new_safes += 1;
        }

        if !undetermined.is_empty() {
            // Counts were range-checked above.
            if let Some(sentence) = Sentence::new(undetermined, adjusted) {
                if !self.sentences.contains(&sentence) {
                    self.sentences.push(sentence);
                }
            }
        }

        let inferred = self.infer()?;
        summary.new_safes += inferred.new_safes;
        summary.new_mines += inferred.new_mines;
        summary.derived_sentences += inferred.derived_sentences;
        Ok(summary)
    }

    /// Validate an observation against the current state without touching it.
    /// Returns the undetermined neighbors and the number of proven-mine neighbors.
    fn check_observation(&self, cell: Cell, count: usize) -> Result<(Vec<Cell>, usize)> {
        if !self.neighbors.in_bounds(cell) {
            return Err(KnowledgeError::OutOfBounds {
                cell,
                height: self.height(),
                width: self.width(),
            });
        }
        if self.moves_made.contains(&cell) {
            return Err(KnowledgeError::AlreadyRevealed(cell));
        }
        if self.mines.contains(&cell) {
            return Err(KnowledgeError::RevealedMine(cell));
        }

        let neighbors = self.neighbors.get(cell);
        if count > neighbors.len() {
            return Err(KnowledgeError::CountTooLarge {
                cell,
                count,
                neighbors: neighbors.len(),
            });
        }

        let mut undetermined = Vec::with_capacity(neighbors.len());
        let mut known_mines = 0;
        for &n in neighbors {
            if self.mines.contains(&n) {
                known_mines += 1;
            } else if !self.safes.contains(&n) {
                undetermined.push(n);
            }
        }
        if count < known_mines || count - known_mines > undetermined.len() {
            return Err(KnowledgeError::Contradiction(format!(
                "{cell} reports {count} mines but {known_mines} are proven and {} are undetermined",
                undetermined.len()
            )));
        }
        // Marking the cell safe must not starve a sentence that needs it as a mine.
        if let Some(s) = self
            .sentences
            .iter()
            .find(|s| s.contains(cell) && s.count() == s.len())
        {
            return Err(KnowledgeError::Contradiction(format!(
                "{cell} must be a mine according to {s}"
            )));
        }
        Ok((undetermined, known_mines))
    }

    /// Run direct and subset inference until neither adds anything.
    /// Calling this again on an unchanged base is a no-op.
    pub fn infer(&mut self) -> Result<InferenceSummary> {
        let mut summary = InferenceSummary::default();
        loop {
            let (safes, mines) = self.apply_direct_inference()?;
            summary.new_safes += safes;
            summary.new_mines += mines;

            let derived = self.apply_subset_inference()?;
            if derived == 0 {
                break;
            }
            summary.derived_sentences += derived;
        }
        Ok(summary)
    }

    /// Mark `cell` safe everywhere. Returns `false` if it was already known safe.
    fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        if self.mines.contains(&cell) {
            return Err(KnowledgeError::Contradiction(format!(
                "{cell} is proven to be both a mine and safe"
            )));
        }
        if !self.safes.insert(cell) {
            return Ok(false);
        }
        for sentence in &mut self.sentences {
            if !sentence.mark_safe(cell) {
                return Err(KnowledgeError::Contradiction(format!(
                    "{cell} cannot be safe in {sentence}"
                )));
            }
        }
        Ok(true)
    }

    /// Mark `cell` a mine everywhere. Returns `false` if it was already known.
    fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        if self.safes.contains(&cell) {
            return Err(KnowledgeError::Contradiction(format!(
                "{cell} is proven to be both safe and a mine"
            )));
        }
        if !self.mines.insert(cell) {
            return Ok(false);
        }
        for sentence in &mut self.sentences {
            if !sentence.mark_mine(cell) {
                return Err(KnowledgeError::Contradiction(format!(
                    "{cell} cannot be a mine in {sentence}"
                )));
            }
        }
        Ok(true)
    }

    /// Resolve every cell a single sentence determines, repeating until a
    /// pass resolves nothing. Returns the number of new safes and mines.
    fn apply_direct_inference(&mut self) -> Result<(usize, usize)> {
        let mut total_safes = 0;
        let mut total_mines = 0;

        loop {
            // Snapshot first: marking mutates the sentences being scanned.
            let mut safe_cells = BTreeSet::new();
            let mut mine_cells = BTreeSet::new();
            for sentence in &self.sentences {
                safe_cells.extend(sentence.known_safes());
                mine_cells.extend(sentence.known_mines());
            }
            safe_cells.retain(|c| !self.safes.contains(c));
            mine_cells.retain(|c| !self.mines.contains(c));

            if safe_cells.is_empty() && mine_cells.is_empty() {
                break;
            }

            for cell in safe_cells {
                if self.mark_safe(cell)? {
                    trace!(%cell, "inferred safe");
                    total_safes += 1;
                }
            }
            for cell in mine_cells {
                if self.mark_mine(cell)? {
                    trace!(%cell, "inferred mine");
                    total_mines += 1;
                }
            }

            self.prune();
        }

        Ok((total_safes, total_mines))
    }

    /// Drop exhausted sentences and collapse ones that became equal.
    fn prune(&mut self) {
        let mut seen = HashSet::with_capacity(self.sentences.len());
        self.sentences
            .retain(|s| !s.is_empty() && seen.insert(s.clone()));
    }

    /// One pass over all ordered pairs, adding every sentence the subset rule
    /// derives that isn't already known. Returns how many were added.
    fn apply_subset_inference(&mut self) -> Result<usize> {
        let mut known: HashSet<Sentence> = self.sentences.iter().cloned().collect();
        let mut derived = Vec::new();

        for a in &self.sentences {
            for b in &self.sentences {
                if a == b || a.len() > b.len() {
                    continue;
                }
                if let Some(sentence) = a.subtract_from(b)? {
                    if known.insert(sentence.clone()) {
                        trace!(from = %b, minus = %a, derived = %sentence, "subset inference");
                        derived.push(sentence);
                    }
                }
            }
        }

        let added = derived.len();
        self.sentences.extend(derived);
        Ok(added)
    }

    /// Re-verify the structural invariants of the base.
    pub fn check_invariants(&self) -> Result<()> {
        if let Some(cell) = self.safes.intersection(&self.mines).next() {
            return Err(KnowledgeError::Contradiction(format!(
                "{cell} is in both the safe and mine sets"
            )));
        }
        if let Some(cell) = self.moves_made.difference(&self.safes).next() {
            return Err(KnowledgeError::Contradiction(format!(
                "revealed cell {cell} is not marked safe"
            )));
        }
        for sentence in &self.sentences {
            if sentence.is_empty() || !sentence.is_consistent() {
                return Err(KnowledgeError::Contradiction(format!(
                    "malformed sentence {sentence}"
                )));
            }
            if let Some(cell) = sentence
                .cells()
                .iter()
                .find(|&&c| self.safes.contains(&c) || self.mines.contains(&c))
            {
                return Err(KnowledgeError::Contradiction(format!(
                    "resolved cell {cell} still appears in {sentence}"
                )));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn push_sentence(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }
}
