//! Pieces left en prise by the side that just moved.

use chess_core::{Piece, PieceKind, Position};

use crate::estimator::PlyContext;
use crate::material::value;

/// Sum of the values of every piece the mover has left hanging.
///
/// A piece is a candidate unless whatever stood on its square before the
/// move was worth at least as much; that covers untouched pieces and even
/// or favourable trades. A candidate scores once when its attackers
/// outnumber its defenders, or when any attacker is worth less than it.
pub fn hanging_pieces(ctx: &PlyContext<'_>) -> f64 {
    let before = &ctx.record.before;
    let after = &ctx.record.after;
    let mover = before.side_to_move;

    let mut total = 0;
    for sq in 0..64u8 {
        let Some(piece) = after.piece_at(sq) else {
            continue;
        };
        if piece.color != mover || piece.kind == PieceKind::King {
            continue;
        }
        if let Some(previous) = before.piece_at(sq)
            && value(previous.kind) >= value(piece.kind)
        {
            continue;
        }
        if is_hanging(after, sq, piece) {
            total += value(piece.kind);
        }
    }
    total as f64
}

/// Attack test for a single piece, ignoring pins and x-rays.
pub fn is_hanging(pos: &Position, sq: u8, piece: Piece) -> bool {
    let attackers = pos.attackers(piece.color.other(), sq);
    let defenders = pos.attackers(piece.color, sq);
    if attackers.popcount() > defenders.popcount() {
        return true;
    }
    attackers.into_iter().any(|from| {
        pos.piece_at(from)
            .is_some_and(|attacker| value(attacker.kind) < value(piece.kind))
    })
}

#[cfg(test)]
#[path = "hanging_tests.rs"]
mod hanging_tests;
