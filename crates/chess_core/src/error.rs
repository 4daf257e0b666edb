use thiserror::Error;

/// Errors raised while reading positions or moves from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("malformed SAN token '{0}'")]
    InvalidSan(String),

    #[error("illegal move '{san}' in position {fen}")]
    IllegalMove { san: String, fen: String },

    #[error("ambiguous move '{san}' in position {fen}")]
    AmbiguousMove { san: String, fen: String },
}

impl ChessError {
    pub(crate) fn fen(fen: &str, reason: impl Into<String>) -> Self {
        ChessError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while turning PGN text into a game trace.
#[derive(Debug, Error)]
pub enum PgnError {
    #[error("no game found in input")]
    NoGame,

    #[error("bad FEN tag: {0}")]
    BadFen(#[source] ChessError),

    #[error("ply {ply} ('{token}'): {source}")]
    BadMove {
        ply: usize,
        token: String,
        #[source]
        source: ChessError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
