//! Scanner configuration, read from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::filter::TimeClass;

/// Settings for a corpus scan. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory holding the PGN files and game spreadsheets to scan
    pub games_dir: PathBuf,
    /// Where the progress record is kept between runs
    pub snapshot_dir: PathBuf,
    /// Where final reports are written
    pub output_dir: PathBuf,
    /// File extensions to scan, compared case-insensitively. Empty scans every file.
    pub extensions: Vec<String>,
    /// Size of the highest-score leaderboard
    pub high_score_capacity: usize,
    /// Size of the zero-score collection
    pub low_score_capacity: usize,
    /// Save progress after this many games (0 = only at the end)
    pub checkpoint_every: u64,
    /// Log progress after this many games (0 = never)
    pub progress_every: u64,
    pub filter: AdmissionFilter,
    /// Column layout of `.csv` game spreadsheets
    pub csv: CsvColumns,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            games_dir: PathBuf::from("caissabase"),
            snapshot_dir: PathBuf::from("snapshots"),
            output_dir: PathBuf::from("."),
            extensions: vec!["pgn".to_string(), "csv".to_string()],
            high_score_capacity: 100,
            low_score_capacity: 20,
            checkpoint_every: 1000,
            progress_every: 100,
            filter: AdmissionFilter::default(),
            csv: CsvColumns::default(),
        }
    }
}

impl ScanConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
        toml::from_str(&contents).map_err(|source| ScanError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether `path` has one of the configured extensions.
    pub fn wants_file(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Thresholds a game's headers and length must pass before it is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionFilter {
    /// Fewest half-moves in the mainline
    pub min_plies: usize,
    pub min_white_elo: u32,
    pub min_black_elo: u32,
    /// Substrings of the Site tag that exclude a game, case-insensitive
    pub excluded_sites: Vec<String>,
    pub require_site: bool,
    pub require_date: bool,
    /// Reject games whose Event tag repeats the Site tag
    pub reject_event_equal_to_site: bool,
    /// Accepted time classes. Empty accepts any, including unknown ones.
    pub time_classes: Vec<TimeClass>,
}

impl Default for AdmissionFilter {
    fn default() -> Self {
        Self {
            min_plies: 40,
            min_white_elo: 2200,
            min_black_elo: 2200,
            excluded_sites: vec!["chess.com".to_string(), "lichess".to_string()],
            require_site: true,
            require_date: true,
            reject_event_equal_to_site: true,
            time_classes: Vec::new(),
        }
    }
}

/// Zero-based columns of a games spreadsheet with one game per row.
/// The defaults fit the chess.com grandmaster export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvColumns {
    /// Full PGN text of the game, tags included
    pub pgn: usize,
    /// Speed name such as `rapid` or `daily`
    pub time_class: usize,
    pub white_elo: usize,
    pub black_elo: usize,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            pgn: 3,
            time_class: 7,
            white_elo: 11,
            black_elo: 14,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
