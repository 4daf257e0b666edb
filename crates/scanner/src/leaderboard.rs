//! Bounded collections of scored games.

use chess_core::Headers;
use serde::{Deserialize, Serialize};

/// A game that went through the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGame {
    /// File the game came from
    pub source: String,
    /// Position of the game within its file, from 0
    pub index: u64,
    /// Numbered SAN movetext of the mainline
    pub game: String,
    pub headers: Headers,
    pub score: f64,
}

/// The highest scores seen so far, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    capacity: usize,
    entries: Vec<ScoredGame>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Insert behind any entries with the same score, then drop whatever
    /// falls off the end. Returns whether the game made the board.
    pub fn insert(&mut self, game: ScoredGame) -> bool {
        let pos = self.entries.partition_point(|e| e.score >= game.score);
        if pos >= self.capacity {
            return false;
        }
        self.entries.insert(pos, game);
        self.entries.truncate(self.capacity);
        true
    }

    /// Change the capacity, dropping the lowest entries if it shrinks.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    pub fn entries(&self) -> &[ScoredGame] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The first games found that scored exactly zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeroBoard {
    capacity: usize,
    entries: Vec<ScoredGame>,
}

impl ZeroBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Keep the game if it scored zero and there is room left.
    pub fn offer(&mut self, game: &ScoredGame) -> bool {
        if self.entries.len() < self.capacity && game.score == 0.0 {
            self.entries.push(game.clone());
            true
        } else {
            false
        }
    }

    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    pub fn entries(&self) -> &[ScoredGame] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "leaderboard_tests.rs"]
mod leaderboard_tests;
