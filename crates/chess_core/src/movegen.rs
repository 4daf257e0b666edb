use crate::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::{board::Position, types::*};

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move;
    let occupied = pos.occupied();
    let mut own = Bitboard::EMPTY;
    for kind in PieceKind::ALL {
        own |= pos.pieces(us, kind);
    }

    for from in own {
        let Some(pc) = pos.piece_at(from) else {
            continue;
        };
        let targets = match pc.kind {
            PieceKind::Pawn => {
                gen_pawn(pos, from, us, out);
                continue;
            }
            PieceKind::Knight => knight_attacks(from),
            PieceKind::Bishop => bishop_attacks(from, occupied),
            PieceKind::Rook => rook_attacks(from, occupied),
            PieceKind::Queen => queen_attacks(from, occupied),
            PieceKind::King => {
                gen_castle(pos, from, us, out);
                king_attacks(from)
            }
        };
        for to in targets & !own {
            out.push(Move::new(from, to));
        }
    }
}

fn push_pawn_move(from: u8, to: u8, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(to) == promo_rank {
        for pk in PROMOTIONS {
            let mut mv = Move::new(from, to);
            mv.promo = Some(pk);
            out.push(mv);
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);

    let (dir, start_rank, promo_rank): (i8, i8, i8) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(from, to, promo_rank, out);

        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    for to in pawn_attacks(from, c) {
        match pos.piece_at(to) {
            Some(target) if target.color != c => push_pawn_move(from, to, promo_rank, out),
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    use crate::types::squares::*;

    // (king_from, right, king_to, squares that must be empty, squares that must be safe)
    let options: [(u8, bool, u8, &[u8], &[u8]); 2] = match c {
        Color::White => [
            (E1, pos.castling.wk, G1, &[F1, G1][..], &[F1, G1][..]),
            (E1, pos.castling.wq, C1, &[D1, C1, B1][..], &[D1, C1][..]),
        ],
        Color::Black => [
            (E8, pos.castling.bk, G8, &[F8, G8][..], &[F8, G8][..]),
            (E8, pos.castling.bq, C8, &[D8, C8, B8][..], &[D8, C8][..]),
        ],
    };

    // Can't castle out of check
    if pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    for (king_from, right, king_to, empty, safe) in options {
        if from != king_from || !right {
            continue;
        }
        if empty.iter().any(|&s| pos.piece_at(s).is_some()) {
            continue;
        }
        if safe.iter().any(|&s| pos.is_square_attacked(s, enemy)) {
            continue;
        }
        let mut mv = Move::new(king_from, king_to);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
