use super::*;

#[test]
fn test_knight_attacks() {
    // Knight on e4 (square 28) should attack 8 squares
    assert_eq!(knight_attacks(28).popcount(), 8);

    // Knight on a1 only reaches b3 and c2
    let attacks = knight_attacks(0);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(10)); // c2
    assert!(attacks.contains(17)); // b3

    // Knight on h1 (square 7) should attack 2 squares
    assert_eq!(knight_attacks(7).popcount(), 2);
}

#[test]
fn test_king_attacks() {
    assert_eq!(king_attacks(28).popcount(), 8);
    assert_eq!(king_attacks(0).popcount(), 3);
    assert_eq!(king_attacks(63).popcount(), 3);
}

#[test]
fn test_pawn_attacks_by_color() {
    // White pawn on e4 attacks d5 and f5
    let attacks = pawn_attacks(28, Color::White);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(35)); // d5
    assert!(attacks.contains(37)); // f5

    // Black pawn on e5 attacks d4 and f4
    let attacks = pawn_attacks(36, Color::Black);
    assert!(attacks.contains(27)); // d4
    assert!(attacks.contains(29)); // f4

    // Edge file pawns attack one square
    assert_eq!(pawn_attacks(8, Color::White).popcount(), 1);
    assert_eq!(pawn_attacks(55, Color::Black).popcount(), 1);
}

#[test]
fn test_slider_attacks_empty_board() {
    assert_eq!(rook_attacks(28, Bitboard::EMPTY).popcount(), 14);
    assert_eq!(bishop_attacks(28, Bitboard::EMPTY).popcount(), 13);
    assert_eq!(queen_attacks(0, Bitboard::EMPTY).popcount(), 21);
}

#[test]
fn test_rook_attacks_with_blockers() {
    // Rook on a1, blocker on a4
    let occupied = Bitboard::from_square(24);
    let attacks = rook_attacks(0, occupied);
    assert!(attacks.contains(8)); // a2
    assert!(attacks.contains(16)); // a3
    assert!(attacks.contains(24)); // a4 (can capture)
    assert!(!attacks.contains(32)); // a5 (blocked)
    assert!(attacks.contains(7)); // h1
}

#[test]
fn test_bishop_attacks_blocked_on_descending_ray() {
    // Bishop on h8, blocker on e5: d4 and beyond are hidden
    let occupied = Bitboard::from_square(36);
    let attacks = bishop_attacks(63, occupied);
    assert!(attacks.contains(54)); // g7
    assert!(attacks.contains(36)); // e5
    assert!(!attacks.contains(27)); // d4
    assert_eq!(attacks.popcount(), 3);
}
