//! Move generation node counts against well-known perft results.
//! Depths are kept shallow; the estimator only needs one-ply lookahead.

use chess_core::{Position, STARTPOS_FEN, legal_moves_into};

fn perft(pos: &mut Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut moves = Vec::new();
    legal_moves_into(pos, &mut moves);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        let undo = pos.make_move(mv);
        nodes += perft(pos, depth - 1);
        pos.unmake_move(mv, undo);
    }
    nodes
}

const CASES: [(&str, &[u64]); 5] = [
    (STARTPOS_FEN, &[20, 400, 8902]),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2039],
    ),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]),
    (
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9467],
    ),
    (
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[44, 1486],
    ),
];

#[test]
fn test_perft_counts() {
    for (fen, expected) in CASES {
        let mut pos = Position::from_fen(fen).unwrap();
        for (i, &nodes) in expected.iter().enumerate() {
            let depth = i as u8 + 1;
            assert_eq!(perft(&mut pos, depth), nodes, "{fen} depth {depth}");
        }
        // make/unmake must leave the position untouched
        assert_eq!(pos, Position::from_fen(fen).unwrap());
    }
}
