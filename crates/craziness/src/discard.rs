//! The two conditions that throw a game out instead of scoring it.

use std::collections::HashMap;

use chess_core::{Move, Position, legal_moves_into};
use serde::{Deserialize, Serialize};

/// Plies of lopsided material needed before a game counts as a rout.
pub const IMBALANCE_WINDOW: usize = 14;

/// Material difference at or below which a position still counts as balanced.
pub const BALANCED_LIMIT: u32 = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscardReason {
    /// One side stayed far ahead in material for a whole window of plies.
    SustainedImbalance,
    /// A threefold repetition could be claimed.
    Repetition,
}

impl std::fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscardReason::SustainedImbalance => write!(f, "sustained imbalance"),
            DiscardReason::Repetition => write!(f, "threefold repetition"),
        }
    }
}

/// True once the last `IMBALANCE_WINDOW` entries of `history` are all
/// above `BALANCED_LIMIT`.
pub fn sustained_imbalance(history: &[u32]) -> bool {
    history.len() >= IMBALANCE_WINDOW
        && history[history.len() - IMBALANCE_WINDOW..]
            .iter()
            .all(|&diff| diff > BALANCED_LIMIT)
}

/// Occurrence counts of every position reached so far, keyed by
/// `Position::repetition_key`.
#[derive(Clone, Debug, Default)]
pub struct RepetitionTable {
    seen: HashMap<u64, u32>,
    scratch: Vec<Move>,
}

impl RepetitionTable {
    /// Start counting from the position before the first ply.
    pub fn new(initial: &Position) -> Self {
        let mut table = RepetitionTable::default();
        table.record(initial);
        table
    }

    pub fn record(&mut self, pos: &Position) -> u32 {
        let count = self.seen.entry(pos.repetition_key()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn occurrences(&self, pos: &Position) -> u32 {
        self.seen.get(&pos.repetition_key()).copied().unwrap_or(0)
    }

    /// Record `pos` and report whether the side to move could claim a draw
    /// by threefold repetition: either `pos` has now occurred three times,
    /// or some legal move reaches a position that has already occurred twice.
    pub fn record_and_check(&mut self, pos: &Position) -> bool {
        if self.record(pos) >= 3 {
            return true;
        }

        let mut probe = pos.clone();
        let mut moves = std::mem::take(&mut self.scratch);
        legal_moves_into(&mut probe, &mut moves);
        let claimable = moves.iter().any(|&mv| {
            let undo = probe.make_move(mv);
            let repeats = self.occurrences(&probe) >= 2;
            probe.unmake_move(mv, undo);
            repeats
        });
        self.scratch = moves;
        claimable
    }
}

#[cfg(test)]
#[path = "discard_tests.rs"]
mod discard_tests;
