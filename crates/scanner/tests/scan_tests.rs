//! End-to-end scans over temporary game directories:
//! - Admission, parse failures and discards are counted, not fatal
//! - Progress is saved and resumed by cursor
//! - Stale or corrupt progress leads to a fresh scan
//! - Spreadsheet rows go through the same filters as PGN games
//! - A panicking estimator costs one game, not the scan

use std::fs;
use std::path::Path;

use chess_core::GameTrace;
use craziness::{Outcome, estimate};
use scanner::{Cursor, ProgressRecord, Report, ScanConfig, Scanner, TimeClass};
use tempfile::TempDir;

const OPERA: &str = r#"[Event "Casual game"]
[Site "Paris FRA"]
[Date "1858.??.??"]
[White "Morphy, Paul"]
[Black "Duke Karl / Count Isouard"]
[WhiteElo "2690"]
[BlackElo "2300"]
[Result "1-0"]

1. e4 e5 2. Nf3 d6 3. d4 Bg4 4. dxe5 Bxf3 5. Qxf3 dxe5 6. Bc4 Nf6 7. Qb3 Qe7
8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 12. O-O-O Rd8 13. Rxd7 Rxd7
14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8# 1-0
"#;

const FOOLS_MATE: &str = r#"[Event "Blitz"]
[Site "Moscow RUS"]
[Date "2001.05.01"]
[White "Weak"]
[Black "Strong"]
[WhiteElo "2400"]
[BlackElo "2500"]
[Result "0-1"]

1. f3 e5 2. g4 Qh4# 0-1
"#;

const NO_RATINGS: &str = r#"[Event "Club"]
[Site "Leeds ENG"]
[Date "2010.01.01"]

1. e4 e5 2. Nf3 Nc6 1/2-1/2
"#;

const ONLINE: &str = r#"[Event "Rated game"]
[Site "https://lichess.org/xyz"]
[Date "2021.02.03"]
[WhiteElo "2900"]
[BlackElo "2900"]

1. d4 d5 2. c4 e6 1-0
"#;

const ILLEGAL: &str = r#"[Event "Typo"]
[Site "Berlin GER"]
[Date "1999.09.09"]
[WhiteElo "2600"]
[BlackElo "2600"]

1. e4 e5 2. Ke3 *
"#;

const SHUFFLE: &str = r#"[Event "Draw"]
[Site "Dortmund GER"]
[Date "2005.07.07"]
[White "A"]
[Black "B"]
[WhiteElo "2700"]
[BlackElo "2700"]

1. Nf3 Nf6 2. Ng1 Ng8 3. Nf3 Nf6 4. Ng1 1/2-1/2
"#;

struct Corpus {
    root: TempDir,
}

impl Corpus {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let games = root.path().join("games");
        fs::create_dir_all(&games).unwrap();
        let first = [OPERA, FOOLS_MATE, NO_RATINGS, ONLINE, ILLEGAL].join("\n");
        fs::write(games.join("a.pgn"), first).unwrap();
        fs::write(games.join("b.pgn"), SHUFFLE).unwrap();
        fs::write(games.join("notes.txt"), "not a game").unwrap();
        Corpus { root }
    }

    fn config(&self) -> ScanConfig {
        let mut config = ScanConfig {
            games_dir: self.root.path().join("games"),
            snapshot_dir: self.root.path().join("snapshots"),
            output_dir: self.root.path().join("out"),
            high_score_capacity: 10,
            low_score_capacity: 5,
            checkpoint_every: 2,
            progress_every: 1,
            ..ScanConfig::default()
        };
        config.filter.min_plies = 4;
        config
    }

    fn snapshots(&self) -> std::path::PathBuf {
        self.root.path().join("snapshots")
    }
}

fn save_cursor(dir: &Path, cursor: Cursor) {
    let mut record = ProgressRecord::new(10, 5);
    record.cursor = cursor;
    record.save(dir).unwrap();
}

#[test]
fn test_full_scan_counts_and_ranks() {
    let corpus = Corpus::new();
    let mut scanner = Scanner::new(corpus.config());
    let record = scanner.run().unwrap().clone();

    let stats = &record.stats;
    assert_eq!(stats.files, 2);
    assert_eq!(stats.games_seen, 6);
    assert_eq!(stats.missing_metadata, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.parse_errors, 1);
    assert_eq!(stats.admitted, 3);
    assert_eq!(stats.scored, 2);
    assert_eq!(stats.discarded, 1);
    assert_eq!(stats.failures, 0);

    let top = record.craziest.entries();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].source, "a.pgn");
    assert_eq!(top[0].index, 0);
    assert!(top[0].score > 0.0);
    assert_eq!(top[0].headers.get("White"), Some("Morphy, Paul"));
    assert!(top[0].game.starts_with("1. e4 e5 2. Nf3 d6"));
    assert_eq!(top[1].score, 0.0);

    let zero = record.boring.entries();
    assert_eq!(zero.len(), 1);
    assert_eq!(zero[0].index, 1);
    assert_eq!(zero[0].game, "1. f3 e5 2. g4 Qh4#");

    // The finished cursor points past the last file
    assert_eq!(record.cursor.file_index, 2);
    assert_eq!(record.cursor.games_done, 0);

    let saved = ProgressRecord::load(&corpus.snapshots()).unwrap().unwrap();
    assert_eq!(saved.stats, record.stats);
    assert_eq!(saved.craziest.len(), record.craziest.len());
    assert_eq!(saved.cursor, record.cursor);
}

#[test]
fn test_resume_skips_handled_games() {
    let corpus = Corpus::new();
    save_cursor(
        &corpus.snapshots(),
        Cursor {
            file_index: 0,
            file_name: "a.pgn".to_string(),
            games_done: 3,
        },
    );

    let mut scanner = Scanner::resume(corpus.config()).unwrap();
    let record = scanner.run().unwrap();

    // Only the online game, the illegal game and the shuffle are left
    assert_eq!(record.stats.games_seen, 3);
    // a.pgn was counted by the run that saved the cursor
    assert_eq!(record.stats.files, 1);
    assert_eq!(record.stats.rejected, 1);
    assert_eq!(record.stats.parse_errors, 1);
    assert_eq!(record.stats.discarded, 1);
    assert!(record.craziest.is_empty());
}

#[test]
fn test_resume_from_second_file() {
    let corpus = Corpus::new();
    save_cursor(
        &corpus.snapshots(),
        Cursor {
            file_index: 1,
            file_name: "b.pgn".to_string(),
            games_done: 0,
        },
    );

    let mut scanner = Scanner::resume(corpus.config()).unwrap();
    let record = scanner.run().unwrap();
    assert_eq!(record.stats.files, 1);
    assert_eq!(record.stats.games_seen, 1);
}

#[test]
fn test_stale_cursor_starts_over() {
    let corpus = Corpus::new();
    save_cursor(
        &corpus.snapshots(),
        Cursor {
            file_index: 0,
            file_name: "renamed.pgn".to_string(),
            games_done: 4,
        },
    );

    let mut scanner = Scanner::resume(corpus.config()).unwrap();
    let record = scanner.run().unwrap();
    assert_eq!(record.stats.games_seen, 6);
}

#[test]
fn test_corrupt_progress_starts_over() {
    let corpus = Corpus::new();
    fs::create_dir_all(corpus.snapshots()).unwrap();
    fs::write(corpus.snapshots().join("progress.json"), "not json").unwrap();

    let mut scanner = Scanner::resume(corpus.config()).unwrap();
    let record = scanner.run().unwrap();
    assert_eq!(record.stats.games_seen, 6);
}

#[test]
fn test_missing_games_dir_is_an_error() {
    let corpus = Corpus::new();
    let config = ScanConfig {
        games_dir: corpus.root.path().join("nowhere"),
        ..corpus.config()
    };
    assert!(Scanner::new(config).run().is_err());
}

#[test]
fn test_report_after_scan() {
    let corpus = Corpus::new();
    let config = corpus.config();
    let mut scanner = Scanner::new(config.clone());
    let record = scanner.run().unwrap();

    let path = Report::new(record).write_to(&config.output_dir).unwrap();
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("Morphy, Paul - Duke Karl / Count Isouard"));
    assert!(text.contains("1. f3 e5 2. g4 Qh4#"));
}

fn crash_on_morphy(trace: &GameTrace) -> Outcome {
    if trace.headers.get("White") == Some("Morphy, Paul") {
        panic!("estimator blew up");
    }
    estimate(trace)
}

#[test]
fn test_estimator_panic_costs_one_game() {
    let corpus = Corpus::new();
    let mut scanner = Scanner::new(corpus.config()).with_estimator(crash_on_morphy);
    let record = scanner.run().unwrap();

    assert_eq!(record.stats.failures, 1);
    assert_eq!(record.stats.admitted, 3);
    // Fool's mate comes right after the crash and the shuffle after that
    assert_eq!(record.stats.scored, 1);
    assert_eq!(record.stats.discarded, 1);
    let top = record.craziest.entries();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].index, 1);
    assert_eq!(record.boring.entries()[0].index, 1);
}

/// A row in the chess.com export layout: index, PGN, time class, ratings.
fn export_row(index: &str, pgn: &str, time_class: &str, white: &str, black: &str) -> String {
    let mut cells = vec![""; 15];
    cells[0] = index;
    cells[3] = pgn;
    cells[7] = time_class;
    cells[11] = white;
    cells[14] = black;
    let quoted: Vec<String> = cells
        .iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect();
    quoted.join(",") + "\n"
}

fn spreadsheet_corpus() -> (TempDir, ScanConfig) {
    let root = tempfile::tempdir().unwrap();
    let games = root.path().join("games");
    fs::create_dir_all(&games).unwrap();
    let rows = [
        ",white_username,white_id,pgn,url,fen,time_control,time_class\n".to_string(),
        export_row("0", OPERA, "rapid", "2690", "2350"),
        export_row("1", FOOLS_MATE, "blitz", "2400", "2500"),
        export_row("2", FOOLS_MATE, "rapid", "2250", "2500"),
        export_row("3", FOOLS_MATE, "rapid", "2400", "2500"),
        export_row("4", ILLEGAL, "rapid", "2600", "2600"),
    ];
    fs::write(games.join("gm_games_2022.csv"), rows.concat()).unwrap();

    let mut config = ScanConfig {
        games_dir: games,
        snapshot_dir: root.path().join("snapshots"),
        output_dir: root.path().join("out"),
        high_score_capacity: 10,
        low_score_capacity: 5,
        checkpoint_every: 2,
        progress_every: 1,
        ..ScanConfig::default()
    };
    config.filter.min_plies = 4;
    config.filter.min_white_elo = 2300;
    config.filter.min_black_elo = 2300;
    config.filter.excluded_sites.clear();
    config.filter.time_classes = vec![TimeClass::Rapid];
    (root, config)
}

#[test]
fn test_spreadsheet_rows_are_filtered_and_ranked() {
    let (_root, config) = spreadsheet_corpus();
    let mut scanner = Scanner::new(config);
    let record = scanner.run().unwrap();

    let stats = &record.stats;
    assert_eq!(stats.files, 1);
    // The column-name row is not a game
    assert_eq!(stats.games_seen, 5);
    // Blitz, and a 2250 rating
    assert_eq!(stats.rejected, 2);
    assert_eq!(stats.parse_errors, 1);
    assert_eq!(stats.admitted, 2);
    assert_eq!(stats.scored, 2);

    let top = record.craziest.entries();
    assert_eq!(top[0].source, "gm_games_2022.csv");
    // Row indices count the column-name row
    assert_eq!(top[0].index, 1);
    assert_eq!(top[0].headers.get("BlackElo"), Some("2350"));
    assert!(top[0].score > 0.0);
    assert_eq!(record.boring.entries()[0].index, 4);
}

#[test]
fn test_spreadsheet_resumes_by_row() {
    let (_root, config) = spreadsheet_corpus();
    save_cursor(
        &config.snapshot_dir,
        Cursor {
            file_index: 0,
            file_name: "gm_games_2022.csv".to_string(),
            games_done: 4,
        },
    );

    let mut scanner = Scanner::resume(config).unwrap();
    let record = scanner.run().unwrap();
    assert_eq!(record.stats.files, 0);
    assert_eq!(record.stats.games_seen, 2);
    assert_eq!(record.stats.scored, 1);
    assert_eq!(record.stats.parse_errors, 1);
    assert_eq!(record.boring.entries()[0].index, 4);
}
