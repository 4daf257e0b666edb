//! Admission of games to scoring, based on their headers and length.

use std::fmt;

use chess_core::Headers;
use serde::{Deserialize, Serialize};

use crate::config::AdmissionFilter;

/// Speed category of a game, from its `TimeClass` or `TimeControl` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeClass {
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Correspondence,
}

impl TimeClass {
    /// Classify a `TimeControl` tag value such as `300+2`, `5400`,
    /// `40/7200:3600` or `-`. Unknown (`?`) or malformed values give `None`.
    pub fn from_time_control(tag: &str) -> Option<TimeClass> {
        let tag = tag.trim();
        if tag == "-" {
            return Some(TimeClass::Correspondence);
        }
        // Only the first period matters for the estimate
        let period = tag.split(':').next()?;
        let (moves, clock) = match period.split_once('/') {
            Some((moves, clock)) => (Some(moves.parse::<u32>().ok()?), clock),
            None => (None, period),
        };
        let (base, increment) = match clock.split_once('+') {
            Some((base, inc)) => (base.parse::<u64>().ok()?, inc.parse::<u64>().ok()?),
            None => (clock.parse::<u64>().ok()?, 0),
        };
        // "1/259200": one move every three days
        if moves == Some(1) {
            return Some(TimeClass::Correspondence);
        }
        Some(TimeClass::from_estimated_secs(base + 40 * increment))
    }

    /// Parse a speed name as written by game sites (`rapid`, `daily`, ...).
    pub fn from_name(name: &str) -> Option<TimeClass> {
        let class = match name.trim().to_ascii_lowercase().as_str() {
            "ultrabullet" => TimeClass::UltraBullet,
            "bullet" => TimeClass::Bullet,
            "blitz" => TimeClass::Blitz,
            "rapid" => TimeClass::Rapid,
            "classical" | "standard" => TimeClass::Classical,
            "correspondence" | "daily" => TimeClass::Correspondence,
            _ => return None,
        };
        Some(class)
    }

    /// Class of a game expected to last `secs` seconds per side.
    pub fn from_estimated_secs(secs: u64) -> TimeClass {
        match secs {
            0..30 => TimeClass::UltraBullet,
            30..180 => TimeClass::Bullet,
            180..480 => TimeClass::Blitz,
            480..1500 => TimeClass::Rapid,
            _ => TimeClass::Classical,
        }
    }
}

impl fmt::Display for TimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeClass::UltraBullet => "ultrabullet",
            TimeClass::Bullet => "bullet",
            TimeClass::Blitz => "blitz",
            TimeClass::Rapid => "rapid",
            TimeClass::Classical => "classical",
            TimeClass::Correspondence => "correspondence",
        };
        f.write_str(name)
    }
}

/// Header facts the filter looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMetadata {
    pub white_elo: u32,
    pub black_elo: u32,
    pub site: Option<String>,
    pub date: Option<String>,
    pub event: Option<String>,
    pub time_class: Option<TimeClass>,
}

impl GameMetadata {
    /// `None` when either rating is missing or not a number.
    pub fn from_headers(headers: &Headers) -> Option<Self> {
        let elo = |name: &str| headers.get(name)?.trim().parse::<u32>().ok();
        Some(Self {
            white_elo: elo("WhiteElo")?,
            black_elo: elo("BlackElo")?,
            site: known(headers.get("Site")),
            date: known(headers.get("Date")),
            event: known(headers.get("Event")),
            // An explicit speed name beats an estimate from the clock
            time_class: headers
                .get("TimeClass")
                .and_then(TimeClass::from_name)
                .or_else(|| {
                    headers
                        .get("TimeControl")
                        .and_then(TimeClass::from_time_control)
                }),
        })
    }
}

/// PGN uses `?` placeholders for unknown tag values.
fn known(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || value.chars().all(|c| matches!(c, '?' | '.')) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Why an otherwise readable game was not scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    TooShort { plies: usize, min: usize },
    LowRating { white: u32, black: u32 },
    MissingSite,
    ExcludedSite(String),
    MissingDate,
    EventIsSite,
    TimeClass(Option<TimeClass>),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort { plies, min } => write!(f, "{plies} plies, need {min}"),
            RejectReason::LowRating { white, black } => write!(f, "ratings {white}/{black}"),
            RejectReason::MissingSite => write!(f, "no site"),
            RejectReason::ExcludedSite(site) => write!(f, "excluded site {site}"),
            RejectReason::MissingDate => write!(f, "no date"),
            RejectReason::EventIsSite => write!(f, "event equals site"),
            RejectReason::TimeClass(Some(class)) => write!(f, "time class {class}"),
            RejectReason::TimeClass(None) => write!(f, "unknown time class"),
        }
    }
}

/// Verdict on a game's headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted(GameMetadata),
    /// Ratings missing or unreadable. Skipped quietly.
    MissingMetadata,
    Rejected(RejectReason),
}

impl AdmissionFilter {
    /// Check everything that does not need the moves.
    pub fn admit_headers(&self, headers: &Headers) -> Admission {
        let Some(meta) = GameMetadata::from_headers(headers) else {
            return Admission::MissingMetadata;
        };
        match self.check(&meta) {
            Ok(()) => Admission::Admitted(meta),
            Err(reason) => Admission::Rejected(reason),
        }
    }

    fn check(&self, meta: &GameMetadata) -> Result<(), RejectReason> {
        if meta.white_elo < self.min_white_elo || meta.black_elo < self.min_black_elo {
            return Err(RejectReason::LowRating {
                white: meta.white_elo,
                black: meta.black_elo,
            });
        }
        match &meta.site {
            None if self.require_site => return Err(RejectReason::MissingSite),
            Some(site) => {
                let lower = site.to_lowercase();
                if self
                    .excluded_sites
                    .iter()
                    .any(|excluded| lower.contains(&excluded.to_lowercase()))
                {
                    return Err(RejectReason::ExcludedSite(site.clone()));
                }
            }
            None => {}
        }
        if self.require_date && meta.date.is_none() {
            return Err(RejectReason::MissingDate);
        }
        if self.reject_event_equal_to_site && meta.event == meta.site {
            return Err(RejectReason::EventIsSite);
        }
        if !self.time_classes.is_empty()
            && !meta
                .time_class
                .is_some_and(|class| self.time_classes.contains(&class))
        {
            return Err(RejectReason::TimeClass(meta.time_class));
        }
        Ok(())
    }

    /// Check the replayed mainline length.
    pub fn admit_length(&self, plies: usize) -> Result<(), RejectReason> {
        if plies < self.min_plies {
            Err(RejectReason::TooShort {
                plies,
                min: self.min_plies,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod filter_tests;
