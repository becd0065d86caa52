//! Command line arguments.

use clap::Parser;
use spotistats_common::{FilterCriteria, SortMode};
use std::path::PathBuf;

/// Listening statistics from Spotify streaming-history exports.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Export files or directories holding them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Only count plays by this artist (case-insensitive, exact)
    #[arg(long)]
    pub artist: Option<String>,

    /// Only count plays from this UTC calendar year
    #[arg(long)]
    pub year: Option<i32>,

    /// Only count plays matching this style tag
    #[arg(long)]
    pub style: Option<String>,

    /// Ranking metric: `ms` (listening time) or `plays`
    #[arg(long, default_value = "ms")]
    pub sort: SortMode,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Export directory, overriding the configuration
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Skip writing CSV files
    #[arg(long)]
    pub no_csv: bool,

    /// Skip writing the HTML report
    #[arg(long)]
    pub no_html: bool,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Filter criteria selected on the command line.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            artist: self.artist.clone(),
            year: self.year,
            style: self.style.clone(),
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_full() {
        let args = Args::try_parse_from([
            "spotistats",
            "exports/",
            "extra.json",
            "--artist",
            "Damso",
            "--year",
            "2024",
            "--style",
            "rap-fr",
            "--sort",
            "plays",
            "--out",
            "/tmp/stats",
            "--no-csv",
            "--no-html",
        ])
        .unwrap();

        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.sort, SortMode::Plays);
        assert!(args.no_csv);
        assert!(args.no_html);
        assert_eq!(
            args.criteria(),
            FilterCriteria::new()
                .with_artist("Damso")
                .with_year(2024)
                .with_style("rap-fr")
        );
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["spotistats", "history.json"]).unwrap();
        assert_eq!(args.sort, SortMode::Duration);
        assert!(args.criteria().is_unfiltered());
        assert!(!args.no_csv);
        assert!(!args.no_html);
    }

    #[test]
    fn test_rejects_bad_sort_and_missing_inputs() {
        assert!(Args::try_parse_from(["spotistats", "a.json", "--sort", "loudness"]).is_err());
        assert!(Args::try_parse_from(["spotistats"]).is_err());
    }
}
