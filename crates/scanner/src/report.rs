//! Human-readable summary of a scan.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::ScanError;
use crate::leaderboard::ScoredGame;
use crate::progress::ProgressRecord;

pub struct Report<'a> {
    record: &'a ProgressRecord,
    generated_at: DateTime<Utc>,
}

impl<'a> Report<'a> {
    pub fn new(record: &'a ProgressRecord) -> Self {
        Self::at(record, Utc::now())
    }

    pub fn at(record: &'a ProgressRecord, generated_at: DateTime<Utc>) -> Self {
        Self {
            record,
            generated_at,
        }
    }

    /// Generate the report text.
    pub fn generate(&self) -> String {
        let record = self.record;
        let mut report = String::new();
        report.push_str("=== Craziness scan ===\n\n");
        let _ = writeln!(report, "Generated: {}", self.generated_at.to_rfc3339());
        let _ = writeln!(report, "Elapsed: {:.2}s\n", record.elapsed_secs);

        let _ = writeln!(
            report,
            "The top {} highest scoring games found were:",
            record.craziest.capacity()
        );
        write_games(&mut report, record.craziest.entries());

        let _ = writeln!(
            report,
            "\n{} games that didn't receive any points:",
            record.boring.capacity()
        );
        write_games(&mut report, record.boring.entries());

        let stats = &record.stats;
        report.push_str("\nStatistics:\n");
        for (label, value) in [
            ("files", stats.files),
            ("games seen", stats.games_seen),
            ("admitted", stats.admitted),
            ("scored", stats.scored),
            ("discarded", stats.discarded),
            ("rejected", stats.rejected),
            ("missing metadata", stats.missing_metadata),
            ("parse errors", stats.parse_errors),
            ("failures", stats.failures),
        ] {
            let _ = writeln!(report, "  {label:<18}{value:>10}");
        }
        report
    }

    /// Write the report to `output_<unix time>.log` in `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ScanError> {
        fs::create_dir_all(dir).map_err(|e| ScanError::io(dir, e))?;
        let path = dir.join(format!("output_{}.log", self.generated_at.timestamp()));
        fs::write(&path, self.generate()).map_err(|e| ScanError::io(&path, e))?;
        Ok(path)
    }
}

fn write_games(report: &mut String, games: &[ScoredGame]) {
    if games.is_empty() {
        report.push_str("  (none)\n");
        return;
    }
    report.push_str(&format!(
        "{:>4}  {:>8}  {:<28} {}\n",
        "#", "Score", "Source", "Players"
    ));
    report.push_str(&"-".repeat(72));
    report.push('\n');
    for (rank, game) in games.iter().enumerate() {
        let tag = |name| game.headers.get(name).unwrap_or("?");
        let _ = writeln!(
            report,
            "{:>4}  {:>8.2}  {:<28} {} - {} ({}, {})",
            rank + 1,
            game.score,
            format!("{}#{}", game.source, game.index + 1),
            tag("White"),
            tag("Black"),
            tag("Event"),
            tag("Date"),
        );
        let _ = writeln!(report, "      {}", game.game);
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
