//! Application-wide error types using thiserror.

use spotistats_common::StatsError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration, input, or export failure.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// No input path yielded a JSON file.
    #[error("no JSON input files found")]
    NoInputFiles,

    /// The input files held no records.
    #[error("nothing to aggregate")]
    NothingToAggregate,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the run failed because of the arguments, configuration, or
    /// input files rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Stats(e) => e.is_user_error(),
            Self::NoInputFiles | Self::NothingToAggregate => true,
            Self::Io(_) => false,
        }
    }

    /// Process exit code: 2 for user errors, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.is_user_error() {
            2
        } else {
            1
        }
    }
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
