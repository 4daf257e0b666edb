//! Game traces: a replayed mainline with the position before and after
//! every ply.

use crate::board::Position;
use crate::error::ChessError;
use crate::movegen::legal_moves;
use crate::pgn::Headers;
use crate::san::move_to_san;
use crate::types::{Color, Move, sq_to_coord};

/// One half-move together with the positions around it.
#[derive(Clone, Debug)]
pub struct PlyRecord {
    pub mv: Move,
    pub san: String,
    pub before: Position,
    pub after: Position,
}

/// An ordered, validated sequence of plies. Every move in a trace is legal
/// in its `before` position, and each `after` is the next ply's `before`.
#[derive(Clone, Debug)]
pub struct GameTrace {
    pub headers: Headers,
    initial: Position,
    plies: Vec<PlyRecord>,
}

impl GameTrace {
    pub fn new(headers: Headers, initial: Position) -> Self {
        Self {
            headers,
            initial,
            plies: Vec::new(),
        }
    }

    /// Build a trace from already-decoded moves, rejecting the first illegal one.
    pub fn from_moves(
        initial: Position,
        moves: impl IntoIterator<Item = Move>,
    ) -> Result<Self, ChessError> {
        let mut trace = GameTrace::new(Headers::default(), initial);
        for mv in moves {
            trace.push(mv)?;
        }
        Ok(trace)
    }

    pub fn initial_position(&self) -> &Position {
        &self.initial
    }

    /// Position after the last recorded ply.
    pub fn current_position(&self) -> &Position {
        self.plies.last().map_or(&self.initial, |p| &p.after)
    }

    pub fn plies(&self) -> &[PlyRecord] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    /// Append a move played from the current position.
    pub fn push(&mut self, mv: Move) -> Result<(), ChessError> {
        let before = self.current_position().clone();
        // Match on squares and promotion so callers need not set the flags.
        let legal = legal_moves(&before)
            .into_iter()
            .find(|m| m.from == mv.from && m.to == mv.to && m.promo == mv.promo)
            .ok_or_else(|| ChessError::IllegalMove {
                san: format!("{}{}", sq_to_coord(mv.from), sq_to_coord(mv.to)),
                fen: before.to_fen(),
            })?;
        self.push_legal(before, legal);
        Ok(())
    }

    pub(crate) fn push_legal(&mut self, before: Position, mv: Move) {
        let san = move_to_san(&before, mv);
        let mut after = before.clone();
        after.make_move(mv);
        self.plies.push(PlyRecord {
            mv,
            san,
            before,
            after,
        });
    }

    /// Numbered SAN movetext, e.g. `1. e4 e5 2. Nf3`.
    pub fn movetext(&self) -> String {
        let mut out = String::new();
        for (i, ply) in self.plies.iter().enumerate() {
            let number = ply.before.fullmove_number;
            match ply.before.side_to_move {
                Color::White => {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&format!("{number}. "));
                }
                Color::Black if i == 0 => out.push_str(&format!("{number}... ")),
                Color::Black => out.push(' '),
            }
            out.push_str(&ply.san);
        }
        out
    }
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod trace_tests;
