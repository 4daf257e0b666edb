//! craziness-scan CLI
//!
//! Rank a PGN corpus by craziness, score single files, and print reports
//! from saved progress.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use craziness::estimate_with_breakdown;
use scanner::{CsvColumns, Entry, GameSource, ProgressRecord, Report, ScanConfig, Scanner};

#[derive(Parser)]
#[command(
    name = "craziness-scan",
    version,
    about = "Find the craziest games in a PGN collection"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Scan a games directory, resuming from saved progress
    Scan {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        games_dir: Option<PathBuf>,
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Ignore saved progress and start over
        #[arg(long)]
        fresh: bool,
    },
    /// Score every game in one PGN file or games spreadsheet
    Score {
        file: PathBuf,
        /// Print how much each heuristic contributed
        #[arg(long)]
        breakdown: bool,
    },
    /// Print a report from saved progress
    Report {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Scan {
            config,
            games_dir,
            snapshot_dir,
            output_dir,
            fresh,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = games_dir {
                config.games_dir = dir;
            }
            if let Some(dir) = snapshot_dir {
                config.snapshot_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            run_scan(config, fresh)
        }
        Cmd::Score { file, breakdown } => run_score(&file, breakdown),
        Cmd::Report {
            config,
            snapshot_dir,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dir) = snapshot_dir {
                config.snapshot_dir = dir;
            }
            run_report(&config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn run_scan(config: ScanConfig, fresh: bool) -> Result<()> {
    let output_dir = config.output_dir.clone();
    let mut scanner = if fresh {
        Scanner::new(config)
    } else {
        Scanner::resume(config).context("reading saved progress")?
    };
    let record = scanner.run().context("scanning games")?;

    let path = Report::new(record)
        .write_to(&output_dir)
        .context("writing report")?;
    log::info!("report written to {}", path.display());
    println!("process finished in {:.2}s", record.elapsed_secs);
    Ok(())
}

fn run_score(path: &Path, breakdown: bool) -> Result<()> {
    let source = GameSource::open(path, &CsvColumns::default())?;
    for (index, entry) in source.enumerate() {
        let raw = match entry? {
            Entry::Game(raw) => raw,
            Entry::Blank => continue,
            Entry::Unreadable(reason) => {
                println!("{:>5}  {:>32}", index + 1, format!("unreadable: {reason}"));
                continue;
            }
        };
        let white = raw.headers.get("White").unwrap_or("?").to_string();
        let black = raw.headers.get("Black").unwrap_or("?").to_string();

        let trace = match raw.into_trace() {
            Ok(trace) => trace,
            Err(e) => {
                println!("{:>5}  {:>32}  {white}-{black}", index + 1, format!("parse error: {e}"));
                continue;
            }
        };
        let (outcome, tally) = estimate_with_breakdown(&trace);
        println!("{:>5}  {:>32}  {white}-{black}", index + 1, outcome.to_string());
        if breakdown {
            println!("       {}", serde_json::to_string(&tally)?);
        }
    }
    Ok(())
}

fn run_report(config: &ScanConfig) -> Result<()> {
    let record = ProgressRecord::load(&config.snapshot_dir)
        .context("reading saved progress")?
        .with_context(|| {
            format!(
                "no progress record in {}",
                config.snapshot_dir.display()
            )
        })?;
    print!("{}", Report::new(&record).generate());
    Ok(())
}
