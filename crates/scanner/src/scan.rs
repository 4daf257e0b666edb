//! The corpus scan loop.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chess_core::{GameTrace, RawGame};
use craziness::{Outcome, estimate};

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::filter::Admission;
use crate::leaderboard::ScoredGame;
use crate::progress::{Cursor, ProgressRecord};
use crate::source::{Entry, GameSource};

/// Scores one replayed game.
pub type Estimator = fn(&GameTrace) -> Outcome;

/// Walks the games directory, scoring every admitted game and keeping the
/// progress record up to date.
pub struct Scanner {
    config: ScanConfig,
    record: ProgressRecord,
    estimator: Estimator,
    /// Elapsed time carried over from earlier runs
    prior_secs: f64,
    started: Instant,
}

impl Scanner {
    /// Start from scratch, ignoring any saved progress.
    pub fn new(config: ScanConfig) -> Self {
        let record = ProgressRecord::new(config.high_score_capacity, config.low_score_capacity);
        Self::with_record(config, record)
    }

    /// Continue from the record in the snapshot directory, if there is a
    /// usable one.
    pub fn resume(config: ScanConfig) -> Result<Self, ScanError> {
        match ProgressRecord::load(&config.snapshot_dir) {
            Ok(Some(mut record)) => {
                log::info!(
                    "resuming at file {} ({}), game {}",
                    record.cursor.file_index + 1,
                    record.cursor.file_name,
                    record.cursor.games_done
                );
                record.craziest.resize(config.high_score_capacity);
                record.boring.resize(config.low_score_capacity);
                Ok(Self::with_record(config, record))
            }
            Ok(None) => {
                log::info!("no progress record found, starting a new scan");
                Ok(Self::new(config))
            }
            Err(e @ ScanError::CorruptProgress { .. }) => {
                log::warn!("{e}; starting a new scan");
                Ok(Self::new(config))
            }
            Err(e) => Err(e),
        }
    }

    fn with_record(config: ScanConfig, record: ProgressRecord) -> Self {
        Self {
            prior_secs: record.elapsed_secs,
            config,
            record,
            estimator: estimate,
            started: Instant::now(),
        }
    }

    /// Score games with `estimator` instead of the craziness estimate.
    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn into_record(self) -> ProgressRecord {
        self.record
    }

    /// Game files of the games directory, sorted by name.
    pub fn game_files(&self) -> Result<Vec<PathBuf>, ScanError> {
        let dir = &self.config.games_dir;
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))? {
            let path = entry.map_err(|e| ScanError::io(dir, e))?.path();
            if path.is_file() && self.config.wants_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Scan every file from the cursor onwards and save the final record.
    pub fn run(&mut self) -> Result<&ProgressRecord, ScanError> {
        self.started = Instant::now();
        let files = self.game_files()?;
        self.check_cursor(&files);

        let first = self.record.cursor.file_index;
        for (index, path) in files.iter().enumerate().skip(first) {
            let name = file_name(path);
            if index != self.record.cursor.file_index || self.record.cursor.file_name != name {
                self.record.cursor = Cursor {
                    file_index: index,
                    file_name: name.clone(),
                    games_done: 0,
                };
            }
            log::info!("processing {name} (file {}/{})", index + 1, files.len());

            match GameSource::open(path, &self.config.csv) {
                Ok(source) => self.scan_file(source, &name)?,
                Err(e) => log::error!("{e}; skipping it"),
            }

            self.record.cursor = Cursor {
                file_index: index + 1,
                file_name: files.get(index + 1).map(|p| file_name(p)).unwrap_or_default(),
                games_done: 0,
            };
        }

        self.checkpoint()?;
        log::info!(
            "scan finished in {:.2}s: {} games seen, {} scored, {} discarded",
            self.record.elapsed_secs,
            self.record.stats.games_seen,
            self.record.stats.scored,
            self.record.stats.discarded
        );
        Ok(&self.record)
    }

    /// Drop a saved cursor that no longer lines up with the directory.
    fn check_cursor(&mut self, files: &[PathBuf]) {
        let cursor = &self.record.cursor;
        if cursor.file_name.is_empty() {
            return;
        }
        let matches = files
            .get(cursor.file_index)
            .is_some_and(|path| file_name(path) == cursor.file_name);
        if !matches {
            log::warn!(
                "saved position {} at file {} does not match the games directory; starting over",
                cursor.file_name,
                cursor.file_index + 1
            );
            self.record =
                ProgressRecord::new(self.config.high_score_capacity, self.config.low_score_capacity);
            self.prior_secs = 0.0;
        }
    }

    fn scan_file(&mut self, source: GameSource, name: &str) -> Result<(), ScanError> {
        // Splitting without replaying moves makes skipping cheap
        let skip = self.record.cursor.games_done;
        if skip == 0 {
            self.record.stats.files += 1;
        } else {
            log::info!("skipping {skip} entries already handled in {name}");
        }

        for (index, entry) in (0u64..).zip(source) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::error!("read failed at entry {}: {e}; skipping the rest", index + 1);
                    return Ok(());
                }
            };
            if index < skip {
                continue;
            }
            let counted = match entry {
                Entry::Game(raw) => {
                    self.process_game(name, index, raw);
                    true
                }
                Entry::Unreadable(reason) => {
                    self.record.stats.games_seen += 1;
                    self.record.stats.parse_errors += 1;
                    log::warn!("{name} row {}: {reason}; skipping it", index + 1);
                    true
                }
                Entry::Blank => false,
            };
            self.record.cursor.games_done = index + 1;
            if counted {
                self.after_game()?;
            }
        }
        Ok(())
    }

    fn process_game(&mut self, source: &str, index: u64, raw: RawGame) {
        let stats = &mut self.record.stats;
        stats.games_seen += 1;

        match self.config.filter.admit_headers(&raw.headers) {
            Admission::Admitted(_) => {}
            Admission::MissingMetadata => {
                stats.missing_metadata += 1;
                return;
            }
            Admission::Rejected(reason) => {
                stats.rejected += 1;
                log::debug!("{source} game {}: rejected ({reason})", index + 1);
                return;
            }
        }

        let trace = match raw.into_trace() {
            Ok(trace) => trace,
            Err(e) => {
                stats.parse_errors += 1;
                log::warn!("{source} game {}: {e}; skipping it", index + 1);
                return;
            }
        };
        if let Err(reason) = self.config.filter.admit_length(trace.len()) {
            stats.rejected += 1;
            log::debug!("{source} game {}: rejected ({reason})", index + 1);
            return;
        }
        stats.admitted += 1;

        let estimator = self.estimator;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| estimator(&trace))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                stats.failures += 1;
                log::error!(
                    "{source} game {}: estimator failed: {}; skipping it",
                    index + 1,
                    panic_message(payload.as_ref())
                );
                return;
            }
        };

        match outcome {
            Outcome::Discarded(reason) => {
                stats.discarded += 1;
                log::debug!("{source} game {}: discarded ({reason})", index + 1);
            }
            Outcome::Scored(score) => {
                stats.scored += 1;
                let entry = ScoredGame {
                    source: source.to_string(),
                    index,
                    game: trace.movetext(),
                    headers: trace.headers,
                    score,
                };
                self.record.boring.offer(&entry);
                if self.record.craziest.insert(entry) {
                    log::debug!("{source} game {}: {score:.2} makes the leaderboard", index + 1);
                }
            }
        }
    }

    fn after_game(&mut self) -> Result<(), ScanError> {
        let seen = self.record.stats.games_seen;
        if self.config.progress_every > 0 && seen % self.config.progress_every == 0 {
            log::info!(
                "processed {seen} games ({} in {})",
                self.record.cursor.games_done,
                self.record.cursor.file_name
            );
        }
        if self.config.checkpoint_every > 0 && seen % self.config.checkpoint_every == 0 {
            log::info!("saving progress at game {seen}");
            self.checkpoint()?;
        }
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<(), ScanError> {
        self.record.elapsed_secs = self.prior_secs + self.started.elapsed().as_secs_f64();
        self.record.save(&self.config.snapshot_dir)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
