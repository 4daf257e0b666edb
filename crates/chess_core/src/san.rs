//! Standard Algebraic Notation.
//!
//! SAN is resolved against the legal moves of a position, so a parsed move
//! always carries the right castle/en-passant flags.

use crate::board::Position;
use crate::error::ChessError;
use crate::movegen::legal_moves;
use crate::types::*;

/// Render `mv` (legal in `pos`) as SAN, including the check/mate suffix.
pub fn move_to_san(pos: &Position, mv: Move) -> String {
    let mut san = String::with_capacity(8);

    if mv.is_castle {
        san.push_str(if file_of(mv.to) > file_of(mv.from) {
            "O-O"
        } else {
            "O-O-O"
        });
    } else if let Some(pc) = pos.piece_at(mv.from) {
        let capture = mv.is_en_passant || pos.piece_at(mv.to).is_some();
        match pc.kind.san_letter() {
            None => {
                if capture {
                    san.push((b'a' + file_of(mv.from) as u8) as char);
                }
            }
            Some(letter) => {
                san.push(letter);
                san.push_str(&disambiguation(pos, mv, pc.kind));
            }
        }
        if capture {
            san.push('x');
        }
        san.push_str(&sq_to_coord(mv.to));
        if let Some(promo) = mv.promo.and_then(PieceKind::san_letter) {
            san.push('=');
            san.push(promo);
        }
    }

    let mut after = pos.clone();
    after.make_move(mv);
    if after.is_checkmate() {
        san.push('#');
    } else if after.in_check(after.side_to_move) {
        san.push('+');
    }
    san
}

fn disambiguation(pos: &Position, mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<u8> = legal_moves(pos)
        .into_iter()
        .filter(|other| other.to == mv.to && other.from != mv.from)
        .filter(|other| pos.piece_at(other.from).map(|p| p.kind) == Some(kind))
        .map(|other| other.from)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }
    let coord = sq_to_coord(mv.from);
    if rivals.iter().all(|&r| file_of(r) != file_of(mv.from)) {
        coord[..1].to_string()
    } else if rivals.iter().all(|&r| rank_of(r) != rank_of(mv.from)) {
        coord[1..].to_string()
    } else {
        coord
    }
}

/// Resolve a SAN token (annotations such as `+`, `#`, `!?` allowed) to the
/// unique legal move it names.
pub fn parse_san(pos: &Position, token: &str) -> Result<Move, ChessError> {
    let core = token.trim_end_matches(['+', '#', '!', '?']);
    if core.is_empty() {
        return Err(ChessError::InvalidSan(token.to_string()));
    }

    let illegal = || ChessError::IllegalMove {
        san: token.to_string(),
        fen: pos.to_fen(),
    };

    let castle = match core {
        "O-O" | "0-0" => Some(6),
        "O-O-O" | "0-0-0" => Some(2),
        _ => None,
    };
    if let Some(file) = castle {
        return legal_moves(pos)
            .into_iter()
            .find(|mv| mv.is_castle && file_of(mv.to) == file)
            .ok_or_else(illegal);
    }

    let pattern = SanPattern::parse(core).ok_or_else(|| ChessError::InvalidSan(token.to_string()))?;

    let mut candidates = legal_moves(pos).into_iter().filter(|mv| pattern.matches(pos, mv));
    let first = candidates.next().ok_or_else(illegal)?;
    if candidates.next().is_some() {
        return Err(ChessError::AmbiguousMove {
            san: token.to_string(),
            fen: pos.to_fen(),
        });
    }
    Ok(first)
}

/// The constraints a non-castling SAN token places on a move.
#[derive(Debug)]
struct SanPattern {
    kind: PieceKind,
    from_file: Option<i8>,
    from_rank: Option<i8>,
    to: u8,
    promo: Option<PieceKind>,
}

impl SanPattern {
    fn parse(core: &str) -> Option<SanPattern> {
        let mut body: Vec<char> = core.chars().filter(|&c| c != 'x' && c != '-').collect();

        // Promotion: "e8=Q" or "e8Q"
        let mut promo = None;
        if let Some(&last) = body.last()
            && let Some(kind) = PieceKind::from_san_letter(last)
            && body.len() >= 3
        {
            promo = Some(kind);
            body.pop();
            if body.last() == Some(&'=') {
                body.pop();
            }
        }

        let kind = match body.first().copied().and_then(PieceKind::from_san_letter) {
            Some(kind) => {
                body.remove(0);
                kind
            }
            None => PieceKind::Pawn,
        };

        if body.len() < 2 {
            return None;
        }
        let dest: String = body[body.len() - 2..].iter().collect();
        let to = coord_to_sq(&dest)?;

        let mut from_file = None;
        let mut from_rank = None;
        for &c in &body[..body.len() - 2] {
            match c {
                'a'..='h' => from_file = Some((c as u8 - b'a') as i8),
                '1'..='8' => from_rank = Some((c as u8 - b'1') as i8),
                _ => return None,
            }
        }

        Some(SanPattern {
            kind,
            from_file,
            from_rank,
            to,
            promo,
        })
    }

    fn matches(&self, pos: &Position, mv: &Move) -> bool {
        !mv.is_castle
            && mv.to == self.to
            && mv.promo == self.promo
            && pos.piece_at(mv.from).map(|p| p.kind) == Some(self.kind)
            && self.from_file.is_none_or(|f| file_of(mv.from) == f)
            && self.from_rank.is_none_or(|r| rank_of(mv.from) == r)
    }
}

#[cfg(test)]
#[path = "san_tests.rs"]
mod san_tests;
