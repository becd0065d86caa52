//! # Spotistats
//!
//! Command line front end: finds export files, reads their records, runs the
//! engine, and hands the report to the console and CSV renderers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;
pub mod source;

pub use app::*;
pub use cli::*;
pub use error::*;
pub use source::*;
