//! Position queries the estimator relies on:
//! - Checkmate vs stalemate vs plain check
//! - Attackers of a square
//! - Repetition keys

use chess_core::{Color, Position, legal_moves, parse_san};

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}

fn play(pos: &mut Position, sans: &[&str]) {
    for san in sans {
        let mv = parse_san(pos, san).unwrap();
        pos.make_move(mv);
    }
}

// =============================================================================
// Mate detection
// =============================================================================

#[test]
fn test_scholars_mate_is_checkmate() {
    let pos = fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    assert!(pos.is_checkmate());
    assert!(legal_moves(&pos).is_empty());
}

#[test]
fn test_stalemate_is_not_checkmate() {
    let pos = fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert!(legal_moves(&pos).is_empty());
    assert!(!pos.in_check(Color::Black));
    assert!(!pos.is_checkmate());
}

#[test]
fn test_check_is_not_checkmate() {
    let pos = fen("rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2");
    assert!(pos.in_check(Color::Black));
    assert!(!pos.is_checkmate());
}

// =============================================================================
// Attackers
// =============================================================================

#[test]
fn test_attackers_counts_every_piece_type() {
    // Black knight on d5 is hit by the e4 pawn, c3 knight, b3 bishop and d1 rook
    let pos = fen("4k3/8/8/3n4/4P3/1BN5/8/3RK3 w - - 0 1");
    let attackers = pos.attackers(Color::White, 35);
    assert_eq!(attackers.popcount(), 4);
    for sq in [28, 18, 17, 3] {
        assert!(attackers.contains(sq), "missing attacker on {sq}");
    }
    assert!(pos.attackers(Color::Black, 35).is_empty());
}

#[test]
fn test_attackers_blocked_slider_not_counted() {
    // Rook on d1 is screened by the white pawn on d3
    let pos = fen("4k3/8/8/3n4/8/3P4/8/3RK3 w - - 0 1");
    let attackers = pos.attackers(Color::White, 35);
    assert!(!attackers.contains(3));
    assert_eq!(attackers.popcount(), 0);
}

#[test]
fn test_pinned_piece_still_attacks() {
    // The e4 knight is pinned to its king by the e8 rook but still covers d6
    let pos = fen("4r1k1/8/8/8/4N3/8/8/4K3 w - - 0 1");
    assert!(pos.attackers(Color::White, 43).contains(28));
}

#[test]
fn test_king_counts_as_attacker() {
    let pos = fen("8/8/8/8/8/8/3q4/4K2k w - - 0 1");
    assert!(pos.attackers(Color::White, 11).contains(4));
}

// =============================================================================
// Repetition keys
// =============================================================================

#[test]
fn test_repetition_key_ignores_clocks() {
    let a = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let b = fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 6 5");
    assert_eq!(a.repetition_key(), b.repetition_key());
}

#[test]
fn test_repetition_key_sees_side_and_castling() {
    let base = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let other_side = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
    let fewer_rights = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1");
    assert_ne!(base.repetition_key(), other_side.repetition_key());
    assert_ne!(base.repetition_key(), fewer_rights.repetition_key());
}

#[test]
fn test_repetition_key_ignores_uncapturable_en_passant() {
    // After 1.e4 no black pawn can take on e3, so the square is irrelevant
    let with_ep = fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    let without = fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    assert_eq!(with_ep.repetition_key(), without.repetition_key());
}

#[test]
fn test_repetition_key_keeps_capturable_en_passant() {
    let with_ep = fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let without = fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3");
    assert_ne!(with_ep.repetition_key(), without.repetition_key());
}

#[test]
fn test_knight_shuffle_returns_to_same_key() {
    let mut pos = Position::startpos();
    let start = pos.repetition_key();
    play(&mut pos, &["Nf3", "Nf6", "Ng1", "Ng8"]);
    assert_eq!(pos.repetition_key(), start);
}

// =============================================================================
// FEN
// =============================================================================

#[test]
fn test_fen_round_trip() {
    for s in [
        chess_core::STARTPOS_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ] {
        assert_eq!(fen(s).to_fen(), s);
    }
}

#[test]
fn test_bad_fen_is_an_error() {
    assert!(Position::from_fen("8/8/8 w - -").is_err());
    assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1").is_err());
    assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
}
