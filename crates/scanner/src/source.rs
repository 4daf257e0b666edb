//! Game sources: PGN files, and spreadsheets with one game per row.
//!
//! Both yield one entry per unit the resume cursor counts (a PGN game or a
//! spreadsheet row), so a resumed scan skips the same units it handled.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chess_core::{PgnReader, RawGame};
use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};

use crate::config::CsvColumns;
use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pgn,
    Csv,
}

impl SourceFormat {
    /// `.csv` files are spreadsheets; anything else is read as PGN.
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceFormat::Csv,
            _ => SourceFormat::Pgn,
        }
    }
}

/// One unit of a games file.
#[derive(Debug, Clone)]
pub enum Entry {
    Game(RawGame),
    /// A spreadsheet row with no game in it, such as the column-name row
    Blank,
    /// A row whose game cannot be read
    Unreadable(String),
}

/// Rows of a games spreadsheet turned into raw games.
///
/// The PGN cell supplies tags and movetext. The rating and time class
/// cells are copied over the `WhiteElo`, `BlackElo` and `TimeClass` tags,
/// so rows pass through the same admission filter as PGN games.
pub struct CsvGames<R> {
    rows: ByteRecordsIntoIter<R>,
    columns: CsvColumns,
}

impl<R: Read> CsvGames<R> {
    pub fn new(reader: R, columns: CsvColumns) -> Self {
        let rows = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_byte_records();
        Self { rows, columns }
    }
}

impl<R: Read> Iterator for CsvGames<R> {
    type Item = Result<Entry, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next()? {
            Ok(row) => Some(Ok(row_entry(&row, &self.columns))),
            Err(e) if e.is_io_error() => Some(Err(e)),
            Err(e) => Some(Ok(Entry::Unreadable(e.to_string()))),
        }
    }
}

fn row_entry(row: &ByteRecord, columns: &CsvColumns) -> Entry {
    let cell = |column: usize| {
        row.get(column)
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|text| !text.is_empty())
    };
    // Exports with an index column leave it empty on the column-name row
    if cell(0).is_none() {
        return Entry::Blank;
    }
    let Some(pgn) = cell(columns.pgn) else {
        return Entry::Unreadable(format!("no PGN in column {}", columns.pgn));
    };
    let mut game = match PgnReader::new(pgn.as_bytes()).next() {
        Some(Ok(game)) => game,
        Some(Err(e)) => return Entry::Unreadable(e.to_string()),
        None => return Entry::Unreadable("empty PGN cell".to_string()),
    };
    for (tag, column) in [
        ("WhiteElo", columns.white_elo),
        ("BlackElo", columns.black_elo),
        ("TimeClass", columns.time_class),
    ] {
        if let Some(value) = cell(column) {
            game.headers.insert(tag, value);
        }
    }
    Entry::Game(game)
}

enum Entries {
    Pgn(PgnReader<BufReader<File>>),
    Csv(CsvGames<File>),
}

/// An open games file of either format.
pub struct GameSource {
    path: PathBuf,
    entries: Entries,
}

impl GameSource {
    pub fn open(path: &Path, columns: &CsvColumns) -> Result<Self, ScanError> {
        let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
        let entries = match SourceFormat::of(path) {
            SourceFormat::Pgn => Entries::Pgn(PgnReader::new(BufReader::new(file))),
            SourceFormat::Csv => Entries::Csv(CsvGames::new(file, columns.clone())),
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }
}

impl Iterator for GameSource {
    /// An error means the rest of the file cannot be read.
    type Item = Result<Entry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match &mut self.entries {
            Entries::Pgn(games) => games.next()?.map(Entry::Game).map_err(|source| ScanError::Pgn {
                path: self.path.clone(),
                source,
            }),
            Entries::Csv(rows) => rows.next()?.map_err(|source| ScanError::Csv {
                path: self.path.clone(),
                source,
            }),
        };
        Some(entry)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod source_tests;
