//! # Spotistats Engine
//!
//! The aggregation engine behind spotistats.
//!
//! Raw export records flow through five stages, each a pure function of its
//! input:
//!
//! 1. [`RecordNormalizer`] turns loosely-typed records into [`PlayEvent`]s.
//! 2. [`Deduplicator`] drops repeats of the same `(timestamp, track)` signature.
//! 3. [`EventFilter`] narrows by artist, year, and style tag.
//! 4. [`Aggregator`] folds events into per-artist, per-track, per-day, and
//!    skip groups plus running totals.
//! 5. [`Ranker`] orders and truncates the groups into a [`StatsReport`].
//!
//! [`StatsEngine`] wires the stages together.
//!
//! [`PlayEvent`]: spotistats_common::PlayEvent

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod dedup;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod style;

pub use aggregator::*;
pub use dedup::*;
pub use filter::*;
pub use normalizer::*;
pub use pipeline::*;
pub use ranker::*;
pub use report::*;
pub use style::*;
