use std::path::PathBuf;

use thiserror::Error;

/// Failures of a scan run as a whole. Problems with individual games are
/// counted and logged instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read games from {}: {source}", path.display())]
    Pgn {
        path: PathBuf,
        #[source]
        source: chess_core::PgnError,
    },

    #[error("cannot read rows from {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("corrupt progress record {}: {source}", path.display())]
    CorruptProgress {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode progress record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }
}
