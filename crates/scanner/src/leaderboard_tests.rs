use super::*;

fn game(source: &str, score: f64) -> ScoredGame {
    ScoredGame {
        source: source.to_string(),
        index: 0,
        game: "1. e4 e5".to_string(),
        headers: Headers::default(),
        score,
    }
}

fn sources(entries: &[ScoredGame]) -> Vec<&str> {
    entries.iter().map(|g| g.source.as_str()).collect()
}

#[test]
fn test_sorted_descending_and_bounded() {
    let mut board = Leaderboard::new(3);
    for (name, score) in [("a", 5.0), ("b", 12.5), ("c", 0.0), ("d", 7.25), ("e", 1.0)] {
        board.insert(game(name, score));
    }
    assert_eq!(board.len(), 3);
    assert_eq!(sources(board.entries()), vec!["b", "d", "a"]);
}

#[test]
fn test_equal_scores_keep_arrival_order() {
    let mut board = Leaderboard::new(4);
    board.insert(game("first", 3.0));
    board.insert(game("second", 3.0));
    board.insert(game("higher", 4.0));
    board.insert(game("third", 3.0));
    assert_eq!(
        sources(board.entries()),
        vec!["higher", "first", "second", "third"]
    );

    // A full board rejects a tie with its last entry
    assert!(!board.insert(game("late", 3.0)));
    assert!(board.insert(game("better", 3.5)));
    assert_eq!(
        sources(board.entries()),
        vec!["higher", "better", "first", "second"]
    );
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let mut board = Leaderboard::new(0);
    assert!(!board.insert(game("a", 100.0)));
    assert!(board.is_empty());
}

#[test]
fn test_resize_truncates() {
    let mut board = Leaderboard::new(5);
    for (i, score) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
        board.insert(game(&i.to_string(), score));
    }
    board.resize(2);
    assert_eq!(board.capacity(), 2);
    assert_eq!(sources(board.entries()), vec!["3", "2"]);
}

#[test]
fn test_zero_board_takes_only_zeros_until_full() {
    let mut board = ZeroBoard::new(2);
    assert!(!board.offer(&game("scored", 0.5)));
    assert!(board.offer(&game("z1", 0.0)));
    assert!(board.offer(&game("z2", 0.0)));
    assert!(!board.offer(&game("z3", 0.0)));
    assert_eq!(sources(board.entries()), vec!["z1", "z2"]);
}
