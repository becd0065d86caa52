//! The style registry: named text classifiers over artist, track, and album.

use regex::{Regex, RegexBuilder};
use spotistats_common::{PlayEvent, Result, StatsError};
use spotistats_config::{builtin_style_rules, StyleRuleConfig};

/// A named classifier. Matches when any of its patterns matches.
#[derive(Debug, Clone)]
pub struct StyleRule {
    tag: String,
    patterns: Vec<Regex>,
}

impl StyleRule {
    /// Compiles `patterns` case-insensitively.
    pub fn new(tag: impl Into<String>, patterns: &[String]) -> Result<Self> {
        let tag = tag.into();
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p).case_insensitive(true).build().map_err(|e| {
                    StatsError::config_with_source(
                        format!("invalid pattern '{p}' in style '{tag}'"),
                        e,
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tag, patterns })
    }

    /// The tag selecting this rule.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether any pattern occurs in `"{artist} {track} {album}"`.
    #[must_use]
    pub fn matches(&self, event: &PlayEvent) -> bool {
        let haystack = format!("{} {} {}", event.artist, event.track, event.album);
        self.patterns.iter().any(|p| p.is_match(&haystack))
    }
}

/// Ordered, read-only table of style rules keyed by tag.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    rules: Vec<StyleRule>,
}

impl StyleRegistry {
    /// Registry from already compiled rules.
    #[must_use]
    pub fn new(rules: Vec<StyleRule>) -> Self {
        Self { rules }
    }

    /// Compiles a registry from configuration.
    pub fn from_config(rules: &[StyleRuleConfig]) -> Result<Self> {
        rules
            .iter()
            .map(|r| StyleRule::new(r.tag.clone(), &r.patterns))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// The registry shipped with the tool.
    pub fn builtin() -> Result<Self> {
        Self::from_config(&builtin_style_rules())
    }

    /// The rule registered under `tag`, if any.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.tag == tag)
    }

    /// Registered tags in lookup order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(StyleRule::tag)
    }

    /// Whether `event` belongs to `tag`. Unknown tags match everything.
    #[must_use]
    pub fn matches(&self, tag: &str, event: &PlayEvent) -> bool {
        self.get(tag).map_or(true, |rule| rule.matches(event))
    }
}
