//! Piece values, baseline piece counts and the per-ply position snapshot.

use chess_core::{Bitboard, Color, PieceKind, Position};

/// Material value of a piece kind. Kings carry a value so they can appear
/// in attacker comparisons.
pub const fn value(kind: PieceKind) -> u32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight | PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 10,
    }
}

/// How many of a kind one side has in the initial setup.
pub const fn typical_count(kind: PieceKind) -> u32 {
    match kind {
        PieceKind::Pawn => 8,
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook => 2,
        PieceKind::Queen | PieceKind::King => 1,
    }
}

/// Totals derived from a single position, rebuilt from the board for every ply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Summed piece values, indexed by `Color::idx`
    pub material: [u32; 2],
    /// Piece counts, indexed by colour then `PieceKind::idx`
    pub counts: [[u32; 6]; 2],
    pub king_square: [Option<u8>; 2],
    /// Pieces of both colours, kings included
    pub pieces_remaining: u32,
}

impl Snapshot {
    pub fn of(pos: &Position) -> Self {
        let mut snapshot = Snapshot::default();
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                let squares: Bitboard = pos.pieces(color, kind);
                let count = squares.popcount();
                snapshot.counts[color.idx()][kind.idx()] = count;
                snapshot.material[color.idx()] += count * value(kind);
                snapshot.pieces_remaining += count;
                if kind == PieceKind::King {
                    snapshot.king_square[color.idx()] = squares.lsb();
                }
            }
        }
        snapshot
    }

    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.counts[color.idx()][kind.idx()]
    }

    /// Absolute difference between white and black material.
    pub fn imbalance(&self) -> u32 {
        self.material[0].abs_diff(self.material[1])
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod material_tests;
