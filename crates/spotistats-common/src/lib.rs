//! # Spotistats Common
//!
//! Shared types, utilities, and common functionality for spotistats.
//!
//! This crate provides the foundational types used across all other crates
//! in the workspace: the normalized [`PlayEvent`], the [`FilterCriteria`]
//! and [`SortMode`] selections, the [`StatsError`] type, and the logging
//! bootstrap.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, StatsError};
pub use logging::{init_default_logging, init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
