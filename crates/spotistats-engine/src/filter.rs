//! Event filtering by artist, year, and style tag.

use crate::style::StyleRegistry;
use spotistats_common::{FilterCriteria, PlayEvent};
use tracing::{debug, instrument, warn};

/// A conjunction of the set conditions in a [`FilterCriteria`].
#[derive(Debug, Clone)]
pub struct EventFilter<'a> {
    artist: Option<String>,
    year: Option<i32>,
    style: Option<String>,
    registry: &'a StyleRegistry,
}

impl<'a> EventFilter<'a> {
    /// Builds a filter. Blank criteria are dropped before use.
    pub fn new(criteria: &FilterCriteria, registry: &'a StyleRegistry) -> Self {
        let criteria = criteria.clone().normalized();

        if let Some(style) = criteria.style.as_deref() {
            if registry.get(style).is_none() {
                warn!(style, "Unknown style tag, style filter disabled");
            }
        }

        Self {
            artist: criteria.artist.map(|a| a.to_lowercase()),
            year: criteria.year,
            style: criteria.style,
            registry,
        }
    }

    /// Whether `event` passes every set condition.
    #[must_use]
    pub fn matches(&self, event: &PlayEvent) -> bool {
        if let Some(artist) = &self.artist {
            if event.artist.to_lowercase() != *artist {
                return false;
            }
        }

        // an unparseable timestamp has no year, so it never matches one
        if let Some(year) = self.year {
            if event.year() != Some(year) {
                return false;
            }
        }

        self.style
            .as_deref()
            .map_or(true, |style| self.registry.matches(style, event))
    }

    /// Keeps the events that match, in input order.
    #[instrument(skip_all)]
    pub fn apply(&self, events: Vec<PlayEvent>) -> Vec<PlayEvent> {
        let before = events.len();
        let kept: Vec<PlayEvent> = events.into_iter().filter(|e| self.matches(e)).collect();
        debug!(kept = kept.len(), removed = before - kept.len(), "Filtered events");
        kept
    }
}
