use super::*;
use crate::types::PieceKind;
use std::collections::HashSet;

#[test]
fn test_keys_are_distinct_and_nonzero() {
    let keys = ZOBRIST.all();
    assert_eq!(keys.len(), 12 * 64 + 1 + 4 + 8);
    let unique: HashSet<u64> = keys.iter().copied().collect();
    assert_eq!(unique.len(), keys.len());
    assert!(!unique.contains(&0));
}

#[test]
fn test_piece_key_depends_on_square_kind_and_color() {
    let pawn = Piece::new(Color::White, PieceKind::Pawn);
    let knight = Piece::new(Color::White, PieceKind::Knight);
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert_ne!(ZOBRIST.piece(pawn, 0), ZOBRIST.piece(pawn, 1));
    assert_ne!(ZOBRIST.piece(pawn, 9), ZOBRIST.piece(knight, 9));
    assert_ne!(ZOBRIST.piece(pawn, 9), ZOBRIST.piece(black_pawn, 9));
    assert_eq!(
        ZOBRIST.piece(Piece::new(Color::Black, PieceKind::King), 63),
        ZOBRIST.all()[12 * 64 - 1]
    );
}

#[test]
fn test_side_and_castling_contributions() {
    assert_eq!(ZOBRIST.side(Color::White), 0);
    assert_ne!(ZOBRIST.side(Color::Black), 0);

    assert_eq!(ZOBRIST.castling([false; 4]), 0);
    let kingside = ZOBRIST.castling([true, false, false, false]);
    let queenside = ZOBRIST.castling([false, true, false, false]);
    assert_eq!(
        ZOBRIST.castling([true, true, false, false]),
        kingside ^ queenside
    );
}

#[test]
fn test_en_passant_files_differ() {
    let files: HashSet<u64> = (0..8).map(|f| ZOBRIST.en_passant(f)).collect();
    assert_eq!(files.len(), 8);
}
