//! The engine's output value.

use crate::aggregator::{AggregateGroup, SkipStat, Totals};
use serde::Serialize;
use spotistats_common::{FilterCriteria, SortMode};
use std::fmt;

/// Filter and sort settings a report was produced with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CriteriaEcho {
    /// Artist filter, if any
    pub artist: Option<String>,
    /// Year filter, if any
    pub year: Option<i32>,
    /// Style filter, if any
    pub style: Option<String>,
    /// Ranking metric
    pub sort: SortMode,
}

impl CriteriaEcho {
    /// Echo of `criteria` after blank values were dropped.
    #[must_use]
    pub fn new(criteria: &FilterCriteria, sort: SortMode) -> Self {
        let criteria = criteria.clone().normalized();
        Self {
            artist: criteria.artist,
            year: criteria.year,
            style: criteria.style,
            sort,
        }
    }
}

impl fmt::Display for CriteriaEcho {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.year.map(|y| y.to_string());
        write!(
            f,
            "artist={}, year={}, style={}, sort={}",
            self.artist.as_deref().unwrap_or("ALL"),
            year.as_deref().unwrap_or("ALL"),
            self.style.as_deref().unwrap_or("ALL"),
            self.sort
        )
    }
}

/// Event counts after each stage before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    /// Raw records received
    pub records: usize,
    /// Events left after deduplication
    pub unique: usize,
    /// Events left after filtering
    pub matched: usize,
}

/// Aggregated listening statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    /// Totals over the filtered events
    pub totals: Totals,
    /// Top artists by the selected metric
    pub top_artists: Vec<AggregateGroup>,
    /// Top tracks by the selected metric
    pub top_tracks: Vec<AggregateGroup>,
    /// Every day group in chronological order
    pub days: Vec<AggregateGroup>,
    /// Every artist's skip rate, highest first
    pub skip_rates: Vec<SkipStat>,
    /// Settings used
    pub criteria: CriteriaEcho,
    /// Stage counts
    pub counts: StageCounts,
}

impl StatsReport {
    /// True when no event survived filtering.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.totals.plays == 0
    }
}
