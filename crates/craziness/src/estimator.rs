//! The per-game fold that runs the discard rules and heuristics ply by ply.

use std::fmt;

use chess_core::{
    Color, GameTrace, PgnError, PieceKind, PlyRecord, Position, parse_game, sq_to_coord,
};
use serde::{Deserialize, Serialize};

use crate::bonus::{
    king_centrality_bonus, king_streak_bonus, mate_bonus, promotion_bonus, rare_square_bonus,
    surplus_bonus,
};
use crate::discard::{DiscardReason, RepetitionTable, sustained_imbalance};
use crate::hanging::hanging_pieces;
use crate::material::Snapshot;

/// A craziness score, already rounded to two decimals.
pub type Score = f64;

/// Result of estimating one game.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Scored(Score),
    Discarded(DiscardReason),
}

impl Outcome {
    pub fn score(self) -> Option<Score> {
        match self {
            Outcome::Scored(score) => Some(score),
            Outcome::Discarded(_) => None,
        }
    }

    pub fn is_discarded(self) -> bool {
        matches!(self, Outcome::Discarded(_))
    }

    /// The score, or `-1.0` for a discarded game.
    pub fn to_legacy_value(self) -> f64 {
        self.score().unwrap_or(-1.0)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Scored(score) => write!(f, "{score:.2}"),
            Outcome::Discarded(reason) => write!(f, "discarded ({reason})"),
        }
    }
}

/// Kind of the piece standing on a move's destination after the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovedPiece {
    Found(PieceKind),
    /// Destination was empty. Cannot happen for a replayed trace; the ply
    /// is classified as a king move so the history stays aligned.
    Fallback,
}

impl MovedPiece {
    pub fn resolve(after: &Position, to: u8) -> Self {
        match after.piece_at(to) {
            Some(piece) => MovedPiece::Found(piece.kind),
            None => MovedPiece::Fallback,
        }
    }

    pub fn kind(self) -> PieceKind {
        match self {
            MovedPiece::Found(kind) => kind,
            MovedPiece::Fallback => PieceKind::King,
        }
    }
}

/// Everything a heuristic may look at for one ply.
#[derive(Clone, Copy, Debug)]
pub struct PlyContext<'a> {
    /// 0-based half-move index
    pub ply: usize,
    pub record: &'a PlyRecord,
    /// Totals of `record.after`
    pub snapshot: &'a Snapshot,
    /// Moved piece kinds up to and including this ply
    pub moved_history: &'a [PieceKind],
}

impl PlyContext<'_> {
    /// Side that played this ply.
    pub fn mover(&self) -> Color {
        self.record.before.side_to_move
    }

    pub fn moved(&self) -> PieceKind {
        self.moved_history
            .last()
            .copied()
            .unwrap_or(PieceKind::King)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heuristic {
    Hanging,
    Mate,
    Surplus,
    Promotion,
    RareSquare,
    KingCentrality,
    KingStreak,
}

/// Evaluation order matches the order deltas are added to the total.
const HEURISTICS: [(Heuristic, fn(&PlyContext<'_>) -> f64); 7] = [
    (Heuristic::Hanging, hanging_pieces),
    (Heuristic::Mate, mate_bonus),
    (Heuristic::Surplus, surplus_bonus),
    (Heuristic::Promotion, promotion_bonus),
    (Heuristic::RareSquare, rare_square_bonus),
    (Heuristic::KingCentrality, king_centrality_bonus),
    (Heuristic::KingStreak, king_streak_bonus),
];

/// How much each heuristic contributed to a game's score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub hanging: f64,
    pub mate: f64,
    pub surplus: f64,
    pub promotion: f64,
    pub rare_square: f64,
    pub king_centrality: f64,
    pub king_streak: f64,
    /// Plies that went through the heuristics
    pub plies_scored: usize,
    /// Unrounded running total, summed in evaluation order
    pub total: f64,
}

impl Breakdown {
    fn add(&mut self, heuristic: Heuristic, delta: f64) {
        let slot = match heuristic {
            Heuristic::Hanging => &mut self.hanging,
            Heuristic::Mate => &mut self.mate,
            Heuristic::Surplus => &mut self.surplus,
            Heuristic::Promotion => &mut self.promotion,
            Heuristic::RareSquare => &mut self.rare_square,
            Heuristic::KingCentrality => &mut self.king_centrality,
            Heuristic::KingStreak => &mut self.king_streak,
        };
        *slot += delta;
        self.total += delta;
    }
}

/// Round to two decimals from the exact decimal value of `raw`, so that
/// `0.015` (stored just below the tie) goes down and `0.025` goes up.
/// Scaling by 100 first would round both the other way.
pub fn round_score(raw: f64) -> Score {
    format!("{raw:.2}").parse().unwrap_or(raw)
}

/// Fold state carried from one ply to the next.
struct Running {
    tally: Breakdown,
    moved: Vec<PieceKind>,
    imbalance: Vec<u32>,
    repetitions: RepetitionTable,
}

struct Discard {
    reason: DiscardReason,
    tally: Breakdown,
}

impl Running {
    fn new(initial: &Position, plies: usize) -> Self {
        Running {
            tally: Breakdown::default(),
            moved: Vec::with_capacity(plies),
            imbalance: Vec::with_capacity(plies),
            repetitions: RepetitionTable::new(initial),
        }
    }

    fn step(mut self, ply: usize, record: &PlyRecord) -> Result<Self, Discard> {
        let snapshot = Snapshot::of(&record.after);

        let moved = MovedPiece::resolve(&record.after, record.mv.to);
        if moved == MovedPiece::Fallback {
            log::warn!(
                "ply {ply} ({}): no piece on {} after the move, counting it as a king move",
                record.san,
                sq_to_coord(record.mv.to)
            );
        }
        self.moved.push(moved.kind());
        self.imbalance.push(snapshot.imbalance());

        if sustained_imbalance(&self.imbalance) {
            return Err(self.discard(ply, DiscardReason::SustainedImbalance));
        }
        if self.repetitions.record_and_check(&record.after) {
            return Err(self.discard(ply, DiscardReason::Repetition));
        }

        let ctx = PlyContext {
            ply,
            record,
            snapshot: &snapshot,
            moved_history: &self.moved,
        };
        for (heuristic, score) in HEURISTICS {
            self.tally.add(heuristic, score(&ctx));
        }
        self.tally.plies_scored += 1;
        Ok(self)
    }

    fn discard(self, ply: usize, reason: DiscardReason) -> Discard {
        log::debug!("discarding game at ply {ply}: {reason}");
        Discard {
            reason,
            tally: self.tally,
        }
    }
}

/// Score a game, also returning the per-heuristic tally. For a discarded
/// game the tally covers the plies before the discard.
pub fn estimate_with_breakdown(trace: &GameTrace) -> (Outcome, Breakdown) {
    let running = Running::new(trace.initial_position(), trace.len());
    let folded = trace
        .plies()
        .iter()
        .enumerate()
        .try_fold(running, |running, (ply, record)| running.step(ply, record));

    match folded {
        Ok(running) => (Outcome::Scored(round_score(running.tally.total)), running.tally),
        Err(discard) => (Outcome::Discarded(discard.reason), discard.tally),
    }
}

/// Score a game.
pub fn estimate(trace: &GameTrace) -> Outcome {
    estimate_with_breakdown(trace).0
}

/// Parse the first game in `text` and score it.
pub fn estimate_pgn(text: &str) -> Result<Outcome, PgnError> {
    parse_game(text).map(|trace| estimate(&trace))
}

#[cfg(test)]
#[path = "estimator_tests.rs"]
mod estimator_tests;
