//! Domain types shared by the engine, the exporters, and the binary.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One listening event after normalization.
///
/// Every field has a usable default, so a `PlayEvent` exists for every raw
/// record no matter how incomplete the record was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Timestamp exactly as found in the record; part of the dedup signature.
    pub timestamp_raw: String,
    /// Parsed UTC timestamp, `None` when `timestamp_raw` did not parse.
    pub timestamp: Option<DateTime<Utc>>,
    /// Milliseconds played.
    pub duration_ms: u64,
    /// Client platform string.
    pub platform: String,
    /// Connection country code.
    pub country: String,
    /// Client IP address.
    pub ip: String,
    /// Album artist name.
    pub artist: String,
    /// Track name.
    pub track: String,
    /// Album name.
    pub album: String,
    /// Opaque track identifier, e.g. `spotify:track:...`.
    pub track_uri: String,
    /// Why playback started.
    pub reason_start: String,
    /// Why playback ended.
    pub reason_end: String,
    /// Whether the user skipped the track.
    pub skipped: bool,
    /// Whether the track was played offline.
    pub offline: bool,
    /// Whether a private session was active.
    pub incognito: bool,
    /// Whether shuffle was on.
    pub shuffle: bool,
}

impl PlayEvent {
    /// The dedup identity of this event.
    #[must_use]
    pub fn signature(&self) -> EventSignature {
        EventSignature {
            timestamp_raw: self.timestamp_raw.clone(),
            track_uri: self.track_uri.clone(),
        }
    }

    /// UTC calendar year of the parsed timestamp.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.timestamp.map(|ts| ts.year())
    }
}

/// `(raw timestamp, track identifier)` pair used to collapse duplicates.
///
/// The raw string is used rather than the parsed date so that two events
/// whose timestamps both fail to parse are not merged into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventSignature {
    /// Raw timestamp string
    pub timestamp_raw: String,
    /// Track identifier
    pub track_uri: String,
}

/// Metric used to rank artists and tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    /// Total listening duration
    #[default]
    #[serde(rename = "ms", alias = "duration")]
    Duration,
    /// Number of plays
    #[serde(rename = "plays")]
    Plays,
}

impl SortMode {
    /// Short name used on the command line and in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Duration => "ms",
            Self::Plays => "plays",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ms" | "duration" | "time" => Ok(Self::Duration),
            "plays" | "count" => Ok(Self::Plays),
            other => Err(format!("unknown sort mode '{other}', expected 'ms' or 'plays'")),
        }
    }
}

/// Conditions narrowing the event set. Unset conditions match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive exact artist match.
    pub artist: Option<String>,
    /// UTC calendar year of the event timestamp.
    pub year: Option<i32>,
    /// Tag from the style registry.
    pub style: Option<String>,
}

impl FilterCriteria {
    /// Criteria that keep every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one artist.
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Restrict to one calendar year.
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restrict to one style tag.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Blank strings count as unset.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            artist: clean(self.artist),
            year: self.year,
            style: clean(self.style),
        }
    }

    /// True when no condition is set.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.artist.is_none() && self.year.is_none() && self.style.is_none()
    }
}
