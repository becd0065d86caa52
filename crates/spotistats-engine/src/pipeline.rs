//! The full normalize, dedup, filter, aggregate, rank pipeline.

use crate::aggregator::Aggregator;
use crate::dedup::Deduplicator;
use crate::filter::EventFilter;
use crate::normalizer::{RawRecord, RecordNormalizer};
use crate::ranker::Ranker;
use crate::report::{CriteriaEcho, StageCounts, StatsReport};
use crate::style::StyleRegistry;
use spotistats_common::{FilterCriteria, Result, SortMode};
use spotistats_config::EngineConfig;
use tracing::{info, instrument};

/// Aggregation engine.
///
/// Holds only read-only settings, so one engine can serve any number of
/// independent runs.
#[derive(Debug, Clone)]
pub struct StatsEngine {
    normalizer: RecordNormalizer,
    registry: StyleRegistry,
    ranker: Ranker,
    chunk_size: Option<usize>,
}

impl StatsEngine {
    /// Engine using `config` for everything but styles, which come from
    /// `registry`.
    #[must_use]
    pub fn new(config: &EngineConfig, registry: StyleRegistry) -> Self {
        Self {
            normalizer: RecordNormalizer::new(config.timestamp_fields.iter().cloned()),
            registry,
            ranker: Ranker::new(config.top_n),
            chunk_size: None,
        }
    }

    /// Engine with the style registry compiled from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let registry = StyleRegistry::from_config(&config.styles)?;
        Ok(Self::new(config, registry))
    }

    /// Aggregate in chunks of `chunk_size` events merged in order.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// The style registry used by the filter.
    #[must_use]
    pub const fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Runs every stage over `records`.
    #[instrument(skip_all, fields(records = records.len(), sort = %sort))]
    pub fn run(&self, records: &[RawRecord], criteria: &FilterCriteria, sort: SortMode) -> StatsReport {
        let events = self.normalizer.normalize_all(records);
        let unique = Deduplicator::new().dedup(events);
        let unique_count = unique.len();

        let matched = EventFilter::new(criteria, &self.registry).apply(unique);

        let aggregator = Aggregator::new();
        let aggregation = match self.chunk_size {
            Some(size) => aggregator.aggregate_chunked(&matched, size),
            None => aggregator.aggregate(&matched),
        };

        let report = StatsReport {
            totals: aggregation.totals,
            top_artists: self.ranker.rank(aggregation.artists.into_values(), sort),
            top_tracks: self.ranker.rank(aggregation.tracks.into_values(), sort),
            days: self.ranker.order_days(aggregation.days.into_values()),
            skip_rates: self.ranker.order_skip_rates(aggregation.skips.into_values()),
            criteria: CriteriaEcho::new(criteria, sort),
            counts: StageCounts {
                records: records.len(),
                unique: unique_count,
                matched: matched.len(),
            },
        };

        info!(
            plays = report.totals.plays,
            artists = report.skip_rates.len(),
            days = report.days.len(),
            "Aggregation complete"
        );
        report
    }
}
