//! PGN reading.
//!
//! `PgnReader` splits a (possibly huge, possibly badly encoded) PGN stream
//! into raw games without touching the moves. Turning a raw game into a
//! `GameTrace` replays its mainline and fails as a whole on the first bad
//! token, so consumers never see a partially valid trace.

use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::PgnError;
use crate::san::parse_san;
use crate::trace::GameTrace;

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Tag pairs in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a tag, replacing an existing value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn parse_tag_line(line: &str) -> Option<(String, String)> {
        let inner = line.strip_prefix('[')?.trim_end().strip_suffix(']')?;
        let (name, rest) = inner.split_once(char::is_whitespace)?;
        let value = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
        Some((name.to_string(), value.replace("\\\"", "\"").replace("\\\\", "\\")))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.iter() {
            writeln!(f, "[{k} \"{}\"]", v.replace('\\', "\\\\").replace('"', "\\\""))?;
        }
        Ok(())
    }
}

/// One game as it appears in the file: tags plus unparsed movetext.
#[derive(Clone, Debug, Default)]
pub struct RawGame {
    pub headers: Headers,
    pub movetext: String,
}

impl RawGame {
    /// Starting position: the `FEN` tag if present, the standard one otherwise.
    pub fn start_position(&self) -> Result<Position, PgnError> {
        match self.headers.get("FEN") {
            Some(fen) => Position::from_fen(fen).map_err(PgnError::BadFen),
            None => Ok(Position::startpos()),
        }
    }

    /// SAN tokens of the mainline. Move numbers, comments, NAGs, variations
    /// and the result marker are dropped.
    pub fn mainline_sans(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut chars = self.movetext.chars();

        while let Some(c) = chars.next() {
            let ended = match c {
                '{' => {
                    let ended = flush_token(&mut current, depth, &mut tokens);
                    for skipped in chars.by_ref() {
                        if skipped == '}' {
                            break;
                        }
                    }
                    ended
                }
                ';' => {
                    let ended = flush_token(&mut current, depth, &mut tokens);
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            break;
                        }
                    }
                    ended
                }
                '(' => {
                    let ended = flush_token(&mut current, depth, &mut tokens);
                    depth += 1;
                    ended
                }
                ')' => {
                    let ended = flush_token(&mut current, depth, &mut tokens);
                    depth = depth.saturating_sub(1);
                    ended
                }
                c if c.is_whitespace() => flush_token(&mut current, depth, &mut tokens),
                c => {
                    current.push(c);
                    false
                }
            };
            if ended {
                return tokens;
            }
        }
        flush_token(&mut current, depth, &mut tokens);
        tokens
    }

    /// Replay the mainline into a trace.
    pub fn into_trace(self) -> Result<GameTrace, PgnError> {
        let start = self.start_position()?;
        let sans = self.mainline_sans();
        let mut trace = GameTrace::new(self.headers, start);
        for (ply, token) in sans.into_iter().enumerate() {
            let before = trace.current_position().clone();
            match parse_san(&before, &token) {
                Ok(mv) => trace.push_legal(before, mv),
                Err(source) => {
                    return Err(PgnError::BadMove {
                        ply,
                        token,
                        source,
                    });
                }
            }
        }
        Ok(trace)
    }
}

/// Finish the token being built. Returns true once the result marker is hit.
fn flush_token(current: &mut String, depth: usize, tokens: &mut Vec<String>) -> bool {
    if current.is_empty() {
        return false;
    }
    let token = std::mem::take(current);
    if depth > 0 {
        return false;
    }
    if RESULTS.contains(&token.as_str()) {
        return true;
    }
    let token = strip_move_number(&token);
    if token.is_empty() || token.starts_with('$') || token.chars().all(|c| c == '!' || c == '?') {
        return false;
    }
    tokens.push(token.to_string());
    false
}

/// "12." / "12..." alone is dropped; "12.e4" keeps "e4".
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token
    }
}

/// Whether a `{...}` comment is still open at the end of `line`.
fn comment_open_after(line: &str, mut open: bool) -> bool {
    for c in line.chars() {
        match (open, c) {
            (true, '}') => open = false,
            (false, '{') => open = true,
            (false, ';') => break,
            _ => {}
        }
    }
    open
}

/// Streaming splitter over a multi-game PGN source.
///
/// Bytes are decoded lossily so a stray invalid byte costs one character,
/// not the file.
pub struct PgnReader<R> {
    reader: R,
    buf: Vec<u8>,
    pending_tag: Option<String>,
    done: bool,
}

impl<R: BufRead> PgnReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
            pending_tag: None,
            done: false,
        }
    }

    fn read_game(&mut self) -> Result<Option<RawGame>, PgnError> {
        let mut game = RawGame::default();
        let mut has_content = false;
        let mut in_movetext = false;
        // Clock and eval annotations wrapped onto their own line start with '['
        let mut in_comment = false;

        if let Some(tag) = self.pending_tag.take() {
            if let Some((k, v)) = Headers::parse_tag_line(&tag) {
                game.headers.insert(k, v);
            }
            has_content = true;
        }

        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                self.done = true;
                return Ok(has_content.then_some(game));
            }
            let text = String::from_utf8_lossy(&self.buf);
            let line = text.trim_start_matches('\u{feff}').trim();

            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            if line.starts_with('[') && !in_comment {
                if in_movetext {
                    self.pending_tag = Some(line.to_string());
                    return Ok(Some(game));
                }
                if let Some((k, v)) = Headers::parse_tag_line(line) {
                    game.headers.insert(k, v);
                }
            } else {
                in_movetext = true;
                in_comment = comment_open_after(line, in_comment);
                game.movetext.push_str(line);
                game.movetext.push('\n');
            }
            has_content = true;
        }
    }
}

impl<R: BufRead> Iterator for PgnReader<R> {
    type Item = Result<RawGame, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done && self.pending_tag.is_none() {
            return None;
        }
        match self.read_game() {
            Ok(Some(game)) => Some(Ok(game)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                self.pending_tag = None;
                Some(Err(e))
            }
        }
    }
}

/// Parse the first game in `text` into a trace.
pub fn parse_game(text: &str) -> Result<GameTrace, PgnError> {
    PgnReader::new(text.as_bytes())
        .next()
        .ok_or(PgnError::NoGame)??
        .into_trace()
}

#[cfg(test)]
#[path = "pgn_tests.rs"]
mod pgn_tests;
