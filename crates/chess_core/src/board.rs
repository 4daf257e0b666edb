use crate::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::error::ChessError;
use crate::movegen::legal_moves;
use crate::types::squares::*;
use crate::types::*;
use crate::zobrist::ZOBRIST;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        wk: false,
        wq: false,
        bk: false,
        bq: false,
    };

    fn as_array(&self) -> [bool; 4] {
        [self.wk, self.wq, self.bk, self.bq]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

#[derive(Clone, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moved_piece: Piece,
    pub rook_move: Option<(u8, u8)>, // (rook_from, rook_to) for castling
    pub ep_captured_sq: Option<u8>,  // square actually captured in en-passant
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        let mut p = Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights {
                wk: true,
                wq: true,
                bk: true,
                bq: true,
            },
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };

        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.board[f] = Some(Piece::new(Color::White, kind));
            p.board[8 + f] = Some(Piece::new(Color::White, PieceKind::Pawn));
            p.board[48 + f] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            p.board[56 + f] = Some(Piece::new(Color::Black, kind));
        }
        p
    }

    /// Parse Forsyth-Edwards Notation. The clock fields are optional.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(ChessError::fen(fen, "expected at least 4 fields"));
        }

        let mut board = [None; 64];
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::fen(fen, "board must have 8 ranks"));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file: i8 = 0;
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let piece = Piece::from_fen_char(ch)
                        .ok_or_else(|| ChessError::fen(fen, format!("bad piece char '{ch}'")))?;
                    let s = sq(file, rank)
                        .ok_or_else(|| ChessError::fen(fen, "too many files in rank"))?;
                    board[s as usize] = Some(piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(ChessError::fen(fen, "too many files in rank"));
                }
            }
            if file != 8 {
                return Err(ChessError::fen(fen, "not enough files in rank"));
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::fen(fen, format!("bad side to move '{other}'")));
            }
        };

        let mut castling = CastlingRights::NONE;
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.wk = true,
                    'Q' => castling.wq = true,
                    'k' => castling.bk = true,
                    'q' => castling.bq = true,
                    _ => return Err(ChessError::fen(fen, format!("bad castling char '{c}'"))),
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            coord => Some(
                coord_to_sq(coord)
                    .ok_or_else(|| ChessError::fen(fen, "bad en passant square"))?,
            ),
        };

        let halfmove_clock = parts
            .get(4)
            .map(|s| s.parse::<u32>())
            .transpose()
            .map_err(|_| ChessError::fen(fen, "bad halfmove clock"))?
            .unwrap_or(0);
        let fullmove_number = parts
            .get(5)
            .map(|s| s.parse::<u32>())
            .transpose()
            .map_err(|_| ChessError::fen(fen, "bad fullmove number"))?
            .unwrap_or(1);

        Ok(Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[rank * 8 + file] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move.is_white() { 'w' } else { 'b' });
        out.push(' ');
        let rights: String = ['K', 'Q', 'k', 'q']
            .iter()
            .zip(self.castling.as_array())
            .filter(|(_, on)| *on)
            .map(|(c, _)| *c)
            .collect();
        out.push_str(if rights.is_empty() { "-" } else { &rights });
        out.push(' ');
        match self.en_passant {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.pieces(c, PieceKind::King).lsb()
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }
    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        self.board[sq as usize] = pc;
    }

    /// Squares holding a piece of the given colour and kind.
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for (i, slot) in self.board.iter().enumerate() {
            if let Some(pc) = slot
                && pc.color == color
                && pc.kind == kind
            {
                bb.set(i as u8);
            }
        }
        bb
    }

    pub fn occupied(&self) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for (i, slot) in self.board.iter().enumerate() {
            if slot.is_some() {
                bb.set(i as u8);
            }
        }
        bb
    }

    /// Every piece of colour `by` attacking `target` with the current
    /// occupancy. Pinned pieces count; pieces behind another attacker do not.
    pub fn attackers(&self, by: Color, target: u8) -> Bitboard {
        let occupied = self.occupied();
        let queens = self.pieces(by, PieceKind::Queen);
        let diagonal = self.pieces(by, PieceKind::Bishop) | queens;
        let straight = self.pieces(by, PieceKind::Rook) | queens;

        // A pawn of `by` attacks target iff a pawn of the other colour on
        // target would attack the pawn's square.
        (pawn_attacks(target, by.other()) & self.pieces(by, PieceKind::Pawn))
            | (knight_attacks(target) & self.pieces(by, PieceKind::Knight))
            | (king_attacks(target) & self.pieces(by, PieceKind::King))
            | (bishop_attacks(target, occupied) & diagonal)
            | (rook_attacks(target, occupied) & straight)
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        !self.attackers(by, target).is_empty()
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Side to move is in check and has no legal reply.
    pub fn is_checkmate(&self) -> bool {
        self.in_check(self.side_to_move) && legal_moves(self).is_empty()
    }

    /// An en passant capture is available and legal right now.
    pub fn has_legal_en_passant(&self) -> bool {
        self.en_passant.is_some() && legal_moves(self).iter().any(|mv| mv.is_en_passant)
    }

    /// Zobrist key identifying the position for repetition purposes:
    /// placement, side to move, castling rights, and the en passant file
    /// only when the capture can actually be played. Clocks are ignored.
    pub fn repetition_key(&self) -> u64 {
        let mut key = self
            .board
            .iter()
            .enumerate()
            .filter_map(|(sq, slot)| slot.map(|pc| ZOBRIST.piece(pc, sq as u8)))
            .fold(0, |key, value| key ^ value);
        key ^= ZOBRIST.side(self.side_to_move);
        key ^= ZOBRIST.castling(self.castling.as_array());
        if let Some(ep) = self.en_passant
            && self.has_legal_en_passant()
        {
            key ^= ZOBRIST.en_passant(file_of(ep) as u8);
        }
        key
    }

    pub fn make_move(&mut self, mv: Move) -> Undo {
        let from = mv.from;
        let to = mv.to;
        let moved = self.piece_at(from).expect("no piece on from-square");
        let mut captured = self.piece_at(to);
        let prev_castling = self.castling.clone();
        let prev_ep = self.en_passant;
        let prev_hmc = self.halfmove_clock;
        let prev_fmn = self.fullmove_number;

        self.en_passant = None;

        // Halfmove clock reset on capture or pawn move
        let mut reset_hmc = moved.kind == PieceKind::Pawn || captured.is_some();

        let mut ep_captured_sq = None;
        if mv.is_en_passant {
            let dir = match moved.color {
                Color::White => -1,
                Color::Black => 1,
            };
            if let Some(cs) = sq(file_of(to), rank_of(to) + dir) {
                captured = self.piece_at(cs);
                self.set_piece(cs, None);
                ep_captured_sq = Some(cs);
                reset_hmc = true;
            }
        }

        self.set_piece(from, None);
        self.set_piece(to, Some(moved));

        if moved.kind == PieceKind::Pawn {
            let r = rank_of(to);
            if (moved.color == Color::White && r == 7) || (moved.color == Color::Black && r == 0) {
                let promo = mv.promo.unwrap_or(PieceKind::Queen);
                self.set_piece(to, Some(Piece::new(moved.color, promo)));
            }
        }

        let mut rook_move = None;
        if mv.is_castle && moved.kind == PieceKind::King {
            let rook_squares = match (moved.color, from, to) {
                (Color::White, E1, G1) => Some((H1, F1)),
                (Color::White, E1, C1) => Some((A1, D1)),
                (Color::Black, E8, G8) => Some((H8, F8)),
                (Color::Black, E8, C8) => Some((A8, D8)),
                _ => None,
            };
            if let Some((rf, rt)) = rook_squares
                && let Some(rook) = self.piece_at(rf)
            {
                self.set_piece(rf, None);
                self.set_piece(rt, Some(rook));
                rook_move = Some((rf, rt));
            }
        }

        // A king move, a rook leaving its corner, or a rook captured on its
        // corner each drop the matching rights.
        if moved.kind == PieceKind::King {
            match moved.color {
                Color::White => {
                    self.castling.wk = false;
                    self.castling.wq = false;
                }
                Color::Black => {
                    self.castling.bk = false;
                    self.castling.bq = false;
                }
            }
        }
        for corner in [from, to] {
            match corner {
                A1 => self.castling.wq = false,
                H1 => self.castling.wk = false,
                A8 => self.castling.bq = false,
                H8 => self.castling.bk = false,
                _ => {}
            }
        }

        // Double pawn push sets en-passant square
        if moved.kind == PieceKind::Pawn && (rank_of(to) - rank_of(from)).abs() == 2 {
            self.en_passant = sq(file_of(from), (rank_of(from) + rank_of(to)) / 2);
        }

        self.halfmove_clock = if reset_hmc {
            0
        } else {
            self.halfmove_clock + 1
        };

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        Undo {
            captured,
            castling: prev_castling,
            en_passant: prev_ep,
            halfmove_clock: prev_hmc,
            fullmove_number: prev_fmn,
            moved_piece: moved,
            rook_move,
            ep_captured_sq,
        }
    }

    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some((rf, rt)) = undo.rook_move {
            let rook = self.piece_at(rt);
            self.set_piece(rt, None);
            self.set_piece(rf, rook);
        }

        // The moved piece goes back as it was, which also reverts promotions.
        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved_piece));

        match undo.ep_captured_sq {
            Some(cs) => self.set_piece(cs, undo.captured),
            None => self.set_piece(mv.to, undo.captured),
        }
    }
}
