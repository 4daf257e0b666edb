//! Pre-computed attack tables.
//!
//! This module contains:
//! - Knight, king and pawn attack tables (constant)
//! - Sliding piece attacks using the classical ray approach
//!
//! Both attack queries on a `Position` and move generation go through here,
//! so "who attacks this square" and "where can this piece go" never disagree.

use crate::bitboard::Bitboard;
use crate::types::Color;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const WHITE_PAWN_DELTAS: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_DELTAS: [(i8, i8); 2] = [(-1, -1), (1, -1)];

/// Ray directions as (file, rank) steps. Index order: N, NE, E, SE, S, SW, W, NW.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let f = file + deltas[i].0;
            let r = rank + deltas[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
pub static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
pub static WHITE_PAWN_ATTACKS: [Bitboard; 64] = leaper_table(&WHITE_PAWN_DELTAS);
pub static BLACK_PAWN_ATTACKS: [Bitboard; 64] = leaper_table(&BLACK_PAWN_DELTAS);

/// RAYS[direction][square] gives all squares in that direction from sq (not including sq).
pub static RAYS: [[Bitboard; 64]; 8] = {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = DIRECTIONS[dir];
        let mut sq = 0usize;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
                f += df;
                r += dr;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
};

/// Squares a pawn of `color` on `sq` attacks.
#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[sq as usize],
        Color::Black => BLACK_PAWN_ATTACKS[sq as usize],
    }
}

#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

// Rays pointing towards higher square indices stop at their lowest blocker,
// the others at their highest.
#[inline]
fn ray_attacks(sq: u8, occupied: Bitboard, dir: usize) -> Bitboard {
    let ray = RAYS[dir][sq as usize];
    let blockers = ray & occupied;
    let first = if matches!(dir, 0 | 1 | 2 | 7) {
        blockers.lsb()
    } else {
        blockers.msb()
    };
    match first {
        Some(blocker) => ray & !RAYS[dir][blocker as usize],
        None => ray,
    }
}

#[inline]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, 1)
        | ray_attacks(sq, occupied, 3)
        | ray_attacks(sq, occupied, 5)
        | ray_attacks(sq, occupied, 7)
}

#[inline]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, 0)
        | ray_attacks(sq, occupied, 2)
        | ray_attacks(sq, occupied, 4)
        | ray_attacks(sq, occupied, 6)
}

#[inline]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
