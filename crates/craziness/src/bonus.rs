//! Flat and growing bonuses for unusual events on a single ply.

use chess_core::{Bitboard, Color, PieceKind};

use crate::estimator::PlyContext;
use crate::material::typical_count;

pub const MATE_BONUS: f64 = 20.0;
pub const KING_CENTRALITY_BONUS: f64 = 2.5;
/// Last ply index on which the opening-phase king bonuses apply.
pub const EARLY_PLY_LIMIT: usize = 30;
/// Fewest pieces on the board for a king walk to count as premature.
pub const CROWDED_BOARD: u32 = 20;
const STREAK_BASE: f64 = 1.5;
const STREAK_GROWTH: f64 = 1.075;

/// Mate delivered by castling or by a king move.
pub fn mate_bonus(ctx: &PlyContext<'_>) -> f64 {
    let record = ctx.record;
    let king_moved = record
        .before
        .piece_at(record.mv.from)
        .is_some_and(|p| p.kind == PieceKind::King);
    if record.after.is_checkmate() && (record.mv.is_castle || king_moved) {
        MATE_BONUS
    } else {
        0.0
    }
}

/// Pieces beyond the starting set, for both colours. Paid again on every
/// ply the surplus stays on the board.
pub fn surplus_bonus(ctx: &PlyContext<'_>) -> f64 {
    let mut bonus = 0.0;
    for color in Color::BOTH {
        for kind in PieceKind::ALL {
            let count = ctx.snapshot.count(color, kind);
            let baseline = typical_count(kind);
            if count <= baseline {
                continue;
            }
            let extra = count - baseline;
            bonus += match kind {
                PieceKind::Queen if extra == 1 => 0.5,
                PieceKind::Queen => 0.5 + 5.0 * (extra - 1) as f64,
                _ => 4.0 * extra as f64,
            };
        }
    }
    bonus
}

/// Promotions, with rarer choices worth more.
pub fn promotion_bonus(ctx: &PlyContext<'_>) -> f64 {
    match ctx.record.mv.promo {
        Some(PieceKind::Queen) => 2.5,
        Some(PieceKind::Knight) => 7.5,
        Some(PieceKind::Rook) => 8.5,
        Some(PieceKind::Bishop) => 12.5,
        _ => 0.0,
    }
}

/// Minor pieces and queens landing in a corner.
pub fn rare_square_bonus(ctx: &PlyContext<'_>) -> f64 {
    let mv = ctx.record.mv;
    if mv.is_castle || !Bitboard::CORNERS.contains(mv.to) {
        return 0.0;
    }
    match ctx.moved() {
        PieceKind::Queen | PieceKind::Bishop => 2.0,
        PieceKind::Knight => 3.0,
        _ => 0.0,
    }
}

/// Mover's king on the fourth or fifth rank early, with enemy queens around.
pub fn king_centrality_bonus(ctx: &PlyContext<'_>) -> f64 {
    let mover = ctx.mover();
    let central = ctx.snapshot.king_square[mover.idx()]
        .is_some_and(|sq| Bitboard::CENTER_RANKS.contains(sq));
    let enemy_queens = ctx.snapshot.count(mover.other(), PieceKind::Queen);
    if central && ctx.ply <= EARLY_PLY_LIMIT && enemy_queens > 0 {
        KING_CENTRALITY_BONUS
    } else {
        0.0
    }
}

/// Consecutive king moves by the same side on a crowded board.
pub fn king_streak_bonus(ctx: &PlyContext<'_>) -> f64 {
    if ctx.ply > EARLY_PLY_LIMIT || ctx.snapshot.pieces_remaining < CROWDED_BOARD {
        return 0.0;
    }
    streak_value(ctx.moved_history)
}

/// Walk the mover's own plies backwards (every second entry) while they
/// are king moves. Streak position `k` adds `1.5 * 1.075^((k-1)/2)`.
pub fn streak_value(moved_history: &[PieceKind]) -> f64 {
    moved_history
        .iter()
        .rev()
        .step_by(2)
        .take_while(|&&kind| kind == PieceKind::King)
        .enumerate()
        .map(|(i, _)| STREAK_BASE * STREAK_GROWTH.powf(i as f64 / 2.0))
        .sum()
}

#[cfg(test)]
#[path = "bonus_tests.rs"]
mod bonus_tests;
