//! Corpus scanner for the craziness estimator.
//!
//! This crate provides:
//! - Game sources: PGN files and spreadsheets with a PGN column
//! - Admission filters over PGN headers (ratings, site, date, time class)
//! - Bounded leaderboards of the craziest and the pointless games
//! - A resumable scan loop with atomic progress records
//! - A text report of the results
//!
//! # Usage
//!
//! ```bash
//! # Scan (or resume scanning) a directory of PGN files and CSV exports
//! cargo run --release -p scanner -- scan --games-dir caissabase
//!
//! # Score every game in one file
//! cargo run -p scanner -- score games/immortal.pgn --breakdown
//! ```

mod config;
mod error;
mod filter;
mod leaderboard;
mod progress;
mod report;
mod scan;
mod source;

pub use config::*;
pub use error::*;
pub use filter::*;
pub use leaderboard::*;
pub use progress::*;
pub use report::*;
pub use scan::*;
pub use source::*;
