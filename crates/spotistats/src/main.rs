//! Main entry point for spotistats.

use anyhow::Result;
use clap::Parser;
use spotistats::{load_settings, run, AppError, Args};
use spotistats_common::init_logging;
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = match load_settings(&args) {
        Ok(config) => config,
        Err(e) => return fail(e, "failed to load configuration"),
    };

    if let Err(e) = init_logging(config.logging.to_logging_config()) {
        eprintln!("warning: {e}");
    }
    debug!(?args, "Starting spotistats");

    let mut stdout = std::io::stdout().lock();
    match run(&args, &config, &mut stdout) {
        Ok(outcome) => {
            debug!(
                inputs = outcome.inputs.len(),
                exported = outcome.exported.len(),
                "Done"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => fail(e, "run failed"),
    }
}

// User errors get a short message and exit code 2; anything else is
// reported with its full cause chain.
fn fail(e: AppError, context: &'static str) -> Result<ExitCode> {
    error!(user_error = e.is_user_error(), "{context}: {e}");
    if e.is_user_error() {
        eprintln!("error: {e}");
        Ok(ExitCode::from(e.exit_code()))
    } else {
        Err(anyhow::Error::new(e).context(context))
    }
}
