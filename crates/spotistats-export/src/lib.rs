//! # Spotistats Export
//!
//! Renderers for a [`StatsReport`](spotistats_engine::StatsReport).
//!
//! The engine stops at the report value. This crate turns it into the four
//! CSV files, the HTML chart report, and the console summary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod csv_export;
pub mod html_export;

pub use console::*;
pub use csv_export::*;
pub use html_export::*;
