//! Resumable scan state.
//!
//! The cursor and both leaderboards are saved together as one JSON
//! document, so a resumed scan never pairs a cursor with boards from a
//! different point in the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::leaderboard::{Leaderboard, ZeroBoard};

pub const PROGRESS_FILE: &str = "progress.json";

/// Where the scan stopped: `games_done` entries (raw games, or rows of a
/// spreadsheet) of the file at `file_index` in sorted order are handled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub file_index: usize,
    pub file_name: String,
    pub games_done: u64,
}

/// Running totals for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanStats {
    /// Files opened
    pub files: u64,
    /// Raw games read, whatever became of them
    pub games_seen: u64,
    /// Games that passed every filter and were estimated
    pub admitted: u64,
    pub scored: u64,
    pub discarded: u64,
    pub rejected: u64,
    pub missing_metadata: u64,
    pub parse_errors: u64,
    /// Games where the estimator panicked
    pub failures: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub cursor: Cursor,
    pub craziest: Leaderboard,
    pub boring: ZeroBoard,
    pub stats: ScanStats,
    /// Wall-clock seconds spent scanning, summed over all runs
    #[serde(default)]
    pub elapsed_secs: f64,
    /// When the record was last written (RFC 3339)
    #[serde(default)]
    pub saved_at: Option<String>,
}

impl ProgressRecord {
    pub fn new(high_score_capacity: usize, low_score_capacity: usize) -> Self {
        Self {
            cursor: Cursor::default(),
            craziest: Leaderboard::new(high_score_capacity),
            boring: ZeroBoard::new(low_score_capacity),
            stats: ScanStats::default(),
            elapsed_secs: 0.0,
            saved_at: None,
        }
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(PROGRESS_FILE)
    }

    /// Write the record to `dir`. The JSON goes to a temporary file first
    /// and is renamed over the old record, so a crash mid-write leaves the
    /// previous record intact.
    pub fn save(&mut self, dir: &Path) -> Result<(), ScanError> {
        fs::create_dir_all(dir).map_err(|e| ScanError::io(dir, e))?;
        self.saved_at = Some(chrono::Utc::now().to_rfc3339());

        let json = serde_json::to_string_pretty(self)?;
        let target = Self::path(dir);
        let tmp = dir.join(format!("{PROGRESS_FILE}.tmp"));
        fs::write(&tmp, json).map_err(|e| ScanError::io(&tmp, e))?;
        fs::rename(&tmp, &target).map_err(|e| ScanError::io(&target, e))
    }

    /// Read the record from `dir`. A missing file is `Ok(None)`.
    pub fn load(dir: &Path) -> Result<Option<Self>, ScanError> {
        let path = Self::path(dir);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ScanError::io(&path, e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ScanError::CorruptProgress { path, source })
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod progress_tests;
