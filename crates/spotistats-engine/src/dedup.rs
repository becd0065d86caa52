//! Removal of repeated events across overlapping export files.

use spotistats_common::{EventSignature, PlayEvent};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Keeps the first occurrence of every event signature.
///
/// Two genuinely distinct plays of the same track practically never share a
/// timestamp string, so an exact signature match is treated as the same play
/// exported twice.
#[derive(Debug, Default, Clone, Copy)]
pub struct Deduplicator;

impl Deduplicator {
    /// Creates a deduplicator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the first occurrence of each signature, in input order.
    #[instrument(skip_all)]
    pub fn dedup(&self, events: Vec<PlayEvent>) -> Vec<PlayEvent> {
        let before = events.len();
        let mut seen: HashSet<EventSignature> = HashSet::with_capacity(before);

        let unique: Vec<PlayEvent> = events
            .into_iter()
            .filter(|event| seen.insert(event.signature()))
            .collect();

        debug!(
            kept = unique.len(),
            dropped = before - unique.len(),
            "Deduplicated events"
        );
        unique
    }
}
