//! One end-to-end run of the tool.

use crate::cli::Args;
use crate::error::{AppError, AppResult};
use crate::source::{discover_inputs, load_records};
use spotistats_config::{Config, ConfigLoader};
use spotistats_engine::{StatsEngine, StatsReport};
use spotistats_export::{ConsoleSummary, CsvExporter, HtmlExporter};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, instrument};

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The aggregated report
    pub report: StatsReport,
    /// Files the records were read from
    pub inputs: Vec<PathBuf>,
    /// CSV files and HTML report written, empty when both are off
    pub exported: Vec<PathBuf>,
}

/// Loads the configuration and applies command line overrides.
pub fn load_settings(args: &Args) -> AppResult<Config> {
    let mut config = ConfigLoader::load_from(args.config.as_deref())?;

    if let Some(dir) = &args.out {
        config.export.dir.clone_from(dir);
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.no_csv {
        config.export.csv = false;
    }
    if args.no_html {
        config.export.html = false;
    }

    Ok(config)
}

/// Reads the inputs, aggregates them, prints the summary to `out`, and writes
/// the CSV files and HTML report if enabled.
#[instrument(skip_all)]
pub fn run<W: Write>(args: &Args, config: &Config, out: &mut W) -> AppResult<RunOutcome> {
    let inputs = discover_inputs(&args.inputs)?;
    if inputs.is_empty() {
        return Err(AppError::NoInputFiles);
    }

    let records = load_records(&inputs)?;
    if records.is_empty() {
        return Err(AppError::NothingToAggregate);
    }

    let engine = StatsEngine::from_config(&config.engine)?;
    let report = engine.run(&records, &args.criteria(), args.sort);

    ConsoleSummary::from_config(&config.export).render(&report, out)?;
    out.flush()?;

    let mut exported = Vec::new();
    if config.export.csv {
        exported.extend(CsvExporter::from_config(&config.export).export(&report)?);
        info!(dir = %config.export.dir.display(), "CSV export written");
    }
    if config.export.html {
        exported.push(HtmlExporter::from_config(&config.export).export(&report)?);
    }

    Ok(RunOutcome {
        report,
        inputs,
        exported,
    })
}
