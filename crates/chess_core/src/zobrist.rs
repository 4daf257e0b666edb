//! Keys for telling positions apart when counting repetitions.
//!
//! A repetition key XORs one value per occupied square, one for black to
//! move, one per castling right still held and one for the file of a
//! capturable en passant pawn. The values are a splitmix64 stream evaluated
//! at compile time, so every build and every process agrees on them.

use crate::types::{Color, Piece};

const PIECE_SLOTS: usize = 2 * 6 * 64;
const BLACK_TO_MOVE: usize = PIECE_SLOTS;
const CASTLING: usize = BLACK_TO_MOVE + 1;
const EN_PASSANT: usize = CASTLING + 4;
const KEY_COUNT: usize = EN_PASSANT + 8;

const SEED: u64 = 0x00C0_FFEE_D15C_A5ED;

/// Flat table holding every value a repetition key can include.
pub struct ZobristKeys([u64; KEY_COUNT]);

/// One splitmix64 step: the advanced state and its output.
const fn splitmix64(state: u64) -> (u64, u64) {
    let state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (state, z ^ (z >> 31))
}

impl ZobristKeys {
    const fn generate(seed: u64) -> Self {
        let mut keys = [0u64; KEY_COUNT];
        let mut state = seed;
        let mut i = 0;
        while i < KEY_COUNT {
            let (next, key) = splitmix64(state);
            state = next;
            keys[i] = key;
            i += 1;
        }
        ZobristKeys(keys)
    }

    pub fn piece(&self, piece: Piece, sq: u8) -> u64 {
        self.0[(piece.color.idx() * 6 + piece.kind.idx()) * 64 + sq as usize]
    }

    /// Contribution of the side to move; white to move adds nothing.
    pub fn side(&self, color: Color) -> u64 {
        match color {
            Color::White => 0,
            Color::Black => self.0[BLACK_TO_MOVE],
        }
    }

    /// Contribution of the castling rights held, in `[wk, wq, bk, bq]` order.
    pub fn castling(&self, rights: [bool; 4]) -> u64 {
        rights
            .iter()
            .zip(&self.0[CASTLING..EN_PASSANT])
            .filter(|(held, _)| **held)
            .fold(0, |key, (_, value)| key ^ value)
    }

    pub fn en_passant(&self, file: u8) -> u64 {
        self.0[EN_PASSANT + file as usize]
    }

    pub fn all(&self) -> &[u64] {
        &self.0
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::generate(SEED);

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
