//! Test utilities and shared fixtures for the spotistats workspace.
//!
//! Available to this crate's own tests and, through the `testing` feature,
//! to the tests of every other crate in the workspace.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Map, Value};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call any number of times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a UTC timestamp.
pub fn mock_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Raw export records shaped like the extended streaming history schema.
pub mod records {
    use super::*;

    /// Builder for one raw record.
    #[derive(Debug, Clone)]
    pub struct RecordBuilder {
        fields: Map<String, Value>,
    }

    impl RecordBuilder {
        /// Record with the given timestamp and track URI and nothing else.
        pub fn new(ts: &str, uri: &str) -> Self {
            let mut fields = Map::new();
            fields.insert("ts".to_string(), json!(ts));
            fields.insert("spotify_track_uri".to_string(), json!(uri));
            Self { fields }
        }

        /// Sets the album artist name.
        pub fn artist(self, artist: &str) -> Self {
            self.field("master_metadata_album_artist_name", json!(artist))
        }

        /// Sets the track name.
        pub fn track(self, track: &str) -> Self {
            self.field("master_metadata_track_name", json!(track))
        }

        /// Sets the album name.
        pub fn album(self, album: &str) -> Self {
            self.field("master_metadata_album_album_name", json!(album))
        }

        /// Sets the milliseconds played.
        pub fn ms(self, ms: u64) -> Self {
            self.field("ms_played", json!(ms))
        }

        /// Sets the skipped flag.
        pub fn skipped(self, skipped: bool) -> Self {
            self.field("skipped", json!(skipped))
        }

        /// Sets an arbitrary field.
        pub fn field(mut self, name: &str, value: Value) -> Self {
            self.fields.insert(name.to_string(), value);
            self
        }

        /// Finishes the record.
        pub fn build(self) -> Value {
            Value::Object(self.fields)
        }
    }

    /// A complete play record.
    pub fn play(ts: &str, uri: &str, artist: &str, track: &str, ms: u64) -> Value {
        RecordBuilder::new(ts, uri)
            .artist(artist)
            .track(track)
            .album(&format!("{track} (Album)"))
            .ms(ms)
            .skipped(false)
            .field("platform", json!("android"))
            .field("conn_country", json!("FR"))
            .build()
    }

    /// A complete play record flagged as skipped.
    pub fn skipped_play(ts: &str, uri: &str, artist: &str, track: &str, ms: u64) -> Value {
        RecordBuilder::new(ts, uri)
            .artist(artist)
            .track(track)
            .ms(ms)
            .skipped(true)
            .build()
    }

    /// A record in the older account-data schema (`endTime`, `artistName`, ...).
    pub fn legacy_play(end_time: &str, artist: &str, track: &str, ms: u64) -> Value {
        json!({
            "endTime": end_time,
            "artistName": artist,
            "trackName": track,
            "msPlayed": ms,
        })
    }
}

/// Property-based testing strategies using proptest.
pub mod property_testing {
    use proptest::prelude::*;
    use serde_json::{json, Value};

    const ARTISTS: &[&str] = &["Damso", "damso", "Ninho", "Mitski", "", "Lord Huron"];
    const TRACKS: &[&str] = &["Macarena", "Lettre", "Nobody", "", "The Night We Met"];

    /// A raw record drawn from a small domain so that duplicates, shared
    /// keys, and unparseable timestamps are all common.
    pub fn record_strategy() -> impl Strategy<Value = Value> {
        (
            0usize..ARTISTS.len(),
            0usize..TRACKS.len(),
            prop_oneof![
                (1u32..=28, 0u32..24).prop_map(|(d, h)| format!("2024-02-{d:02}T{h:02}:00:00Z")),
                (1u32..=28).prop_map(|d| format!("2023-11-{d:02} 10:15")),
                Just("garbage".to_string()),
                Just(String::new()),
            ],
            0u32..4,
            0u64..400_000,
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(a, t, ts, uri, ms, skipped, shuffle)| {
                json!({
                    "ts": ts,
                    "spotify_track_uri": format!("spotify:track:{uri}"),
                    "master_metadata_album_artist_name": ARTISTS[a],
                    "master_metadata_track_name": TRACKS[t],
                    "ms_played": ms,
                    "skipped": skipped,
                    "shuffle": shuffle,
                })
            })
    }

    /// Up to `max` raw records.
    pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<Value>> {
        prop::collection::vec(record_strategy(), 0..max)
    }
}
