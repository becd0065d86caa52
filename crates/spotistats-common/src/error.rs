//! Error types and utilities for spotistats

use thiserror::Error;

/// Result type alias for spotistats operations
pub type Result<T> = std::result::Result<T, StatsError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for spotistats operations
///
/// The aggregation engine itself never produces one of these for malformed
/// records; defects in individual records degrade to defaults during
/// normalization. Errors come from the edges: configuration, reading input
/// files, and writing exports.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// Input discovery and reading errors
    #[error("Input error: {message}")]
    Input {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// Export (CSV, console) errors
    #[error("Export error: {message}")]
    Export {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value out of range or inconsistent
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },
}

impl StatsError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new input error with source
    pub fn input_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Input {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new export error
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new export error with source
    pub fn export_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Export {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether the error was caused by the caller's input or configuration
    /// rather than by the environment (disk, permissions).
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Input { .. } | Self::Validation { .. }
        )
    }
}
