//! Craziness estimation for recorded chess games.
//!
//! A game is replayed ply by ply. Each ply first runs two discard checks
//! (a long one-sided material rout, or a claimable threefold repetition)
//! and then adds up a handful of heuristic bonuses: pieces left hanging,
//! surplus pieces from promotions, underpromotions, pieces in corners,
//! early king walks and mates delivered by the king. The sum, rounded to
//! two decimals, is the game's craziness score.
//!
//! ```
//! use craziness::{Outcome, estimate_pgn};
//!
//! let outcome = estimate_pgn("1. f3 e5 2. g4 Qh4# 0-1").unwrap();
//! assert_eq!(outcome, Outcome::Scored(0.0));
//! ```

pub mod bonus;
pub mod discard;
pub mod estimator;
pub mod hanging;
pub mod material;

pub use discard::DiscardReason;
pub use estimator::{
    Breakdown, MovedPiece, Outcome, PlyContext, Score, estimate, estimate_pgn,
    estimate_with_breakdown, round_score,
};
pub use material::Snapshot;

#[cfg(test)]
mod test_support;
