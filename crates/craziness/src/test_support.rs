use chess_core::{GameTrace, PieceKind, Position, parse_san};

use crate::estimator::{MovedPiece, PlyContext};
use crate::material::Snapshot;

/// Replay SAN moves from a FEN into a trace.
pub fn trace_from(fen: &str, sans: &[&str]) -> GameTrace {
    let start = Position::from_fen(fen).unwrap();
    let mut pos = start.clone();
    let mut moves = Vec::new();
    for san in sans {
        let mv = parse_san(&pos, san).unwrap();
        pos.make_move(mv);
        moves.push(mv);
    }
    GameTrace::from_moves(start, moves).unwrap()
}

/// Run `f` on the context of the last ply, optionally overriding its index.
pub fn with_last_ply<R>(
    trace: &GameTrace,
    ply: Option<usize>,
    f: impl FnOnce(&PlyContext<'_>) -> R,
) -> R {
    let record = trace.plies().last().unwrap();
    let snapshot = Snapshot::of(&record.after);
    let history: Vec<PieceKind> = trace
        .plies()
        .iter()
        .map(|p| MovedPiece::resolve(&p.after, p.mv.to).kind())
        .collect();
    let ctx = PlyContext {
        ply: ply.unwrap_or(trace.len() - 1),
        record,
        snapshot: &snapshot,
        moved_history: &history,
    };
    f(&ctx)
}
