//! Single-pass grouping of events by artist, track, and day.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use spotistats_common::{ms_to_hours, ratio, PlayEvent, SortMode};
use tracing::{debug, instrument};

/// Day key used when an event's timestamp did not parse.
pub const UNKNOWN_DAY: &str = "unknown";

/// Plays and listening time accumulated under one key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateGroup {
    /// Grouping identity: lower-cased artist, lower-cased `artist — track`,
    /// or an ISO day.
    pub key: String,
    /// Artist as first seen under this key. Empty for day groups.
    pub artist: String,
    /// Track as first seen under this key. Empty for artist and day groups.
    pub track: String,
    /// Number of contributing events.
    pub plays: u64,
    /// Sum of `duration_ms` over contributing events.
    pub total_ms: u64,
}

impl AggregateGroup {
    /// An empty group.
    #[must_use]
    pub fn new(key: impl Into<String>, artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            artist: artist.into(),
            track: track.into(),
            plays: 0,
            total_ms: 0,
        }
    }

    /// Value of the ranking metric for `sort`.
    #[must_use]
    pub const fn metric(&self, sort: SortMode) -> u64 {
        match sort {
            SortMode::Duration => self.total_ms,
            SortMode::Plays => self.plays,
        }
    }

    /// Listening time in hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        ms_to_hours(self.total_ms)
    }

    // Sums saturate at `u64::MAX` instead of overflowing.
    fn record(&mut self, duration_ms: u64) {
        self.plays = self.plays.saturating_add(1);
        self.total_ms = self.total_ms.saturating_add(duration_ms);
    }

    fn absorb(&mut self, other: &Self) {
        self.plays = self.plays.saturating_add(other.plays);
        self.total_ms = self.total_ms.saturating_add(other.total_ms);
    }
}

/// Skip counts for one artist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipStat {
    /// Lower-cased artist.
    pub key: String,
    /// Artist as first seen.
    pub artist: String,
    /// Number of plays.
    pub plays: u64,
    /// Number of skipped plays.
    pub skipped: u64,
    /// `skipped / plays`, 0 when there are no plays.
    pub skip_rate: f64,
}

impl SkipStat {
    /// An empty entry.
    #[must_use]
    pub fn new(key: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    fn record(&mut self, skipped: bool) {
        self.plays = self.plays.saturating_add(1);
        self.skipped = self.skipped.saturating_add(u64::from(skipped));
        self.skip_rate = ratio(self.skipped, self.plays);
    }

    fn absorb(&mut self, other: &Self) {
        self.plays = self.plays.saturating_add(other.plays);
        self.skipped = self.skipped.saturating_add(other.skipped);
        self.skip_rate = ratio(self.skipped, self.plays);
    }
}

/// Running totals over the filtered event set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Events counted.
    pub plays: u64,
    /// Sum of `duration_ms`.
    pub total_ms: u64,
    /// Events with `skipped` set.
    pub skipped_count: u64,
    /// Events with `offline` set.
    pub offline_count: u64,
    /// Events with `incognito` set.
    pub incognito_count: u64,
    /// Events with `shuffle` set.
    pub shuffle_count: u64,
}

impl Totals {
    /// Fraction of plays that were skipped.
    #[must_use]
    pub fn skip_ratio(&self) -> f64 {
        ratio(self.skipped_count, self.plays)
    }

    /// Total listening time in hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        ms_to_hours(self.total_ms)
    }

    fn record(&mut self, event: &PlayEvent) {
        self.plays = self.plays.saturating_add(1);
        self.total_ms = self.total_ms.saturating_add(event.duration_ms);
        self.skipped_count = self.skipped_count.saturating_add(u64::from(event.skipped));
        self.offline_count = self.offline_count.saturating_add(u64::from(event.offline));
        self.incognito_count = self.incognito_count.saturating_add(u64::from(event.incognito));
        self.shuffle_count = self.shuffle_count.saturating_add(u64::from(event.shuffle));
    }

    fn absorb(&mut self, other: &Self) {
        self.plays = self.plays.saturating_add(other.plays);
        self.total_ms = self.total_ms.saturating_add(other.total_ms);
        self.skipped_count = self.skipped_count.saturating_add(other.skipped_count);
        self.offline_count = self.offline_count.saturating_add(other.offline_count);
        self.incognito_count = self.incognito_count.saturating_add(other.incognito_count);
        self.shuffle_count = self.shuffle_count.saturating_add(other.shuffle_count);
    }
}

/// Fold state of the aggregator.
///
/// Every map keeps its keys in first-occurrence order, which is the tie order
/// the ranker preserves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Groups keyed by lower-cased artist.
    pub artists: IndexMap<String, AggregateGroup>,
    /// Groups keyed by lower-cased `artist — track`.
    pub tracks: IndexMap<String, AggregateGroup>,
    /// Groups keyed by ISO day, or [`UNKNOWN_DAY`].
    pub days: IndexMap<String, AggregateGroup>,
    /// Skip counts keyed by lower-cased artist.
    pub skips: IndexMap<String, SkipStat>,
    /// Running totals.
    pub totals: Totals,
}

impl Aggregation {
    /// Adds one event to every dimension.
    pub fn add(&mut self, event: &PlayEvent) {
        let artist_key = event.artist.to_lowercase();
        let track_key = format!("{} — {}", event.artist, event.track).to_lowercase();
        let day_key = event.timestamp.map_or_else(
            || UNKNOWN_DAY.to_string(),
            |ts| ts.format("%Y-%m-%d").to_string(),
        );

        self.artists
            .entry(artist_key.clone())
            .or_insert_with_key(|key| AggregateGroup::new(key.as_str(), event.artist.as_str(), ""))
            .record(event.duration_ms);

        self.tracks
            .entry(track_key)
            .or_insert_with_key(|key| {
                AggregateGroup::new(key.as_str(), event.artist.as_str(), event.track.as_str())
            })
            .record(event.duration_ms);

        self.days
            .entry(day_key)
            .or_insert_with_key(|key| AggregateGroup::new(key.as_str(), "", ""))
            .record(event.duration_ms);

        self.skips
            .entry(artist_key)
            .or_insert_with_key(|key| SkipStat::new(key.as_str(), event.artist.as_str()))
            .record(event.skipped);

        self.totals.record(event);
    }

    /// Adds `other` into `self`.
    ///
    /// Keys already present keep their position and display names; keys new
    /// to `self` are appended in `other`'s order. Merging partitions in input
    /// order therefore reproduces a sequential fold exactly.
    pub fn merge(&mut self, other: Self) {
        merge_groups(&mut self.artists, other.artists);
        merge_groups(&mut self.tracks, other.tracks);
        merge_groups(&mut self.days, other.days);
        for (key, stat) in other.skips {
            self.skips
                .entry(key)
                .and_modify(|existing| existing.absorb(&stat))
                .or_insert(stat);
        }
        self.totals.absorb(&other.totals);
    }

    /// True when no event was added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.totals.plays == 0
    }
}

fn merge_groups(into: &mut IndexMap<String, AggregateGroup>, from: IndexMap<String, AggregateGroup>) {
    for (key, group) in from {
        into.entry(key)
            .and_modify(|existing| existing.absorb(&group))
            .or_insert(group);
    }
}

/// Folds events into an [`Aggregation`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator;

impl Aggregator {
    /// Creates an aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Sequential fold over `events`.
    #[instrument(skip_all, fields(events = events.len()))]
    pub fn aggregate(&self, events: &[PlayEvent]) -> Aggregation {
        let aggregation = events.iter().fold(Aggregation::default(), |mut acc, event| {
            acc.add(event);
            acc
        });
        debug!(
            artists = aggregation.artists.len(),
            tracks = aggregation.tracks.len(),
            days = aggregation.days.len(),
            "Aggregated events"
        );
        aggregation
    }

    /// Folds fixed-size chunks independently, then merges them in chunk order.
    ///
    /// Produces the same result as [`Aggregator::aggregate`]. A `chunk_size`
    /// of 0 is treated as 1.
    #[instrument(skip_all, fields(events = events.len(), chunk_size))]
    pub fn aggregate_chunked(&self, events: &[PlayEvent], chunk_size: usize) -> Aggregation {
        events
            .chunks(chunk_size.max(1))
            .map(|chunk| {
                chunk.iter().fold(Aggregation::default(), |mut acc, event| {
                    acc.add(event);
                    acc
                })
            })
            .fold(Aggregation::default(), |mut acc, part| {
                acc.merge(part);
                acc
            })
    }
}
