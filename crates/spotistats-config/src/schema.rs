//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use spotistats_common::{LogFormat, LoggingConfig};
use std::path::PathBuf;

/// Main configuration structure for spotistats.
///
/// Every section is optional in the file; missing sections and fields fall
/// back to [`Default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation engine settings.
    pub engine: EngineConfig,
    /// Export settings.
    pub export: ExportConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Aggregation engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of the top artists and top tracks views.
    pub top_n: usize,
    /// Record fields tried, in order, for the event timestamp.
    pub timestamp_fields: Vec<String>,
    /// Style registry, in lookup order.
    pub styles: Vec<StyleRuleConfig>,
}

/// One named style classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRuleConfig {
    /// Tag selected with `--style`.
    pub tag: String,
    /// Regular expressions, matched case-insensitively against
    /// `"{artist} {track} {album}"`.
    pub patterns: Vec<String>,
}

impl StyleRuleConfig {
    /// Creates a rule from a tag and its patterns.
    pub fn new(tag: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving the CSV files and the HTML report.
    pub dir: PathBuf,
    /// Whether CSV files are written at all.
    pub csv: bool,
    /// Whether `report.html` is written.
    pub html: bool,
    /// Rows per section in the console summary.
    pub console_rows: usize,
}

/// Logging settings as they appear in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level filter, e.g. `"info"` or `"spotistats_engine=debug"`.
    pub level: String,
    /// Output style.
    pub format: LogFormat,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    /// Converts to the logging bootstrap configuration.
    #[must_use]
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}
