//! Chess bookkeeping shared by the craziness estimator and the corpus scanner.
//!
//! No search and no evaluation live here: only what is needed to replay a
//! recorded game faithfully and ask questions about the positions it passes
//! through (who attacks a square, is it mate, has it been seen before).

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod movegen;
pub mod pgn;
pub mod san;
pub mod trace;
pub mod types;
pub mod zobrist;

pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use error::{ChessError, PgnError};
pub use movegen::*;
pub use pgn::{Headers, PgnReader, RawGame, parse_game};
pub use san::{move_to_san, parse_san};
pub use trace::{GameTrace, PlyRecord};
pub use types::*;
pub use zobrist::ZOBRIST;
