//! Conversion of raw export records into [`PlayEvent`]s.
//!
//! Export schemas differ between account-data exports and extended
//! streaming-history exports, and between years. Nothing here rejects a
//! record: a missing or malformed field becomes its default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use spotistats_common::PlayEvent;
use spotistats_config::DEFAULT_TIMESTAMP_FIELDS;
use tracing::{debug, instrument};

/// A raw record exactly as read from an export file.
pub type RawRecord = Value;

const DURATION_FIELDS: &[&str] = &["ms_played", "msPlayed"];
const ARTIST_FIELDS: &[&str] = &["master_metadata_album_artist_name", "artistName"];
const TRACK_FIELDS: &[&str] = &["master_metadata_track_name", "trackName"];
const ALBUM_FIELDS: &[&str] = &["master_metadata_album_album_name"];
const TRACK_URI_FIELDS: &[&str] = &["spotify_track_uri", "trackUri"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Builds [`PlayEvent`]s from raw records.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    timestamp_fields: Vec<String>,
}

impl RecordNormalizer {
    /// Normalizer trying `timestamp_fields` in order for the event timestamp.
    pub fn new<I, S>(timestamp_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            timestamp_fields: timestamp_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalizes one record. Non-object records yield an all-default event.
    #[must_use]
    pub fn normalize(&self, record: &RawRecord) -> PlayEvent {
        let Some(fields) = record.as_object() else {
            return PlayEvent::default();
        };

        let (timestamp_raw, timestamp) = self.extract_timestamp(fields);

        PlayEvent {
            timestamp_raw,
            timestamp,
            duration_ms: duration_field(fields, DURATION_FIELDS),
            platform: string_field(fields, &["platform"]),
            country: string_field(fields, &["conn_country"]),
            ip: string_field(fields, &["ip_addr"]),
            artist: string_field(fields, ARTIST_FIELDS),
            track: string_field(fields, TRACK_FIELDS),
            album: string_field(fields, ALBUM_FIELDS),
            track_uri: string_field(fields, TRACK_URI_FIELDS),
            reason_start: string_field(fields, &["reason_start"]),
            reason_end: string_field(fields, &["reason_end"]),
            skipped: truthy(fields.get("skipped")),
            offline: truthy(fields.get("offline")),
            incognito: truthy(fields.get("incognito_mode")),
            shuffle: truthy(fields.get("shuffle")),
        }
    }

    /// Normalizes every record, preserving input order.
    #[instrument(skip_all)]
    pub fn normalize_all<'a, I>(&self, records: I) -> Vec<PlayEvent>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let events: Vec<PlayEvent> = records.into_iter().map(|r| self.normalize(r)).collect();
        let unparsed = events.iter().filter(|e| e.timestamp.is_none()).count();
        debug!(events = events.len(), unparsed, "Normalized records");
        events
    }

    /// The first present candidate wins even when it does not parse; the raw
    /// value is kept either way.
    fn extract_timestamp(&self, fields: &Map<String, Value>) -> (String, Option<DateTime<Utc>>) {
        for name in &self.timestamp_fields {
            match fields.get(name) {
                Some(Value::String(raw)) if !raw.is_empty() => {
                    return (raw.clone(), parse_timestamp(raw));
                }
                Some(Value::Number(n)) => {
                    let parsed = n.as_i64().and_then(DateTime::from_timestamp_millis);
                    return (n.to_string(), parsed);
                }
                _ => {}
            }
        }
        (String::new(), None)
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FIELDS.iter().copied())
    }
}

/// Parses the timestamp formats seen in exports, as UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` (also with a `T` separator and
/// no offset, read as UTC), and a bare `YYYY-MM-DD`.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are false,
/// everything else (including `"false"`, `[]` and `{}`) is true.
#[must_use]
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// First string-valued alias, trimmed. Non-string values are ignored.
fn string_field(fields: &Map<String, Value>, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| fields.get(*name).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// First numeric alias, clamped to `>= 0` and truncated to whole milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration_field(fields: &Map<String, Value>, names: &[&str]) -> u64 {
    names
        .iter()
        .find_map(|name| match fields.get(*name) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        })
        .map_or(0, |n| {
            n.as_u64().unwrap_or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map_or(0, |f| f.trunc() as u64)
            })
        })
}
