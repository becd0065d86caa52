//! Plain-text summary of a report.

use spotistats_common::{ms_to_hours, ms_to_minutes, Result, SortMode};
use spotistats_config::{ExportConfig, DEFAULT_CONSOLE_ROWS};
use spotistats_engine::{AggregateGroup, StatsReport};
use std::io::Write;

const RULE_WIDTH: usize = 47;
const TITLE: &str = " Spotify Stats ";

/// Renders a report as a fixed-layout text summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSummary {
    rows: usize,
}

impl Default for ConsoleSummary {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_ROWS)
    }
}

impl ConsoleSummary {
    /// Summary showing at most `rows` entries per section.
    #[must_use]
    pub const fn new(rows: usize) -> Self {
        Self { rows }
    }

    /// Summary sized from configuration.
    #[must_use]
    pub const fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.console_rows)
    }

    /// Writes the summary to `out`.
    pub fn render<W: Write>(&self, report: &StatsReport, out: &mut W) -> Result<()> {
        let totals = &report.totals;
        let sort = report.criteria.sort;
        let side = RULE_WIDTH.saturating_sub(TITLE.len()) / 2;

        writeln!(out, "{}{TITLE}{}", "=".repeat(side), "=".repeat(side))?;
        writeln!(out, "Filters: {}", report.criteria)?;
        writeln!(out, "Total plays:        {}", totals.plays)?;
        writeln!(
            out,
            "Total time:         {:.2} h ({:.0} min)",
            totals.hours(),
            ms_to_minutes(totals.total_ms)
        )?;
        writeln!(
            out,
            "Skipped plays:      {} ({:.1}%)",
            totals.skipped_count,
            totals.skip_ratio() * 100.0
        )?;
        writeln!(out, "Offline plays:      {}", totals.offline_count)?;
        writeln!(out, "Incognito plays:    {}", totals.incognito_count)?;
        writeln!(out, "Shuffle plays:      {}", totals.shuffle_count)?;
        writeln!(out)?;

        writeln!(out, "Top artists (by {sort}):")?;
        for group in report.top_artists.iter().take(self.rows) {
            writeln!(out, "  - {}: {}", group.artist, metric_label(group, sort))?;
        }
        writeln!(out)?;

        writeln!(out, "Top tracks (by {sort}):")?;
        for group in report.top_tracks.iter().take(self.rows) {
            writeln!(
                out,
                "  - {} — {}: {}",
                group.artist,
                group.track,
                metric_label(group, sort)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "Skip rates (worst first):")?;
        for stat in report.skip_rates.iter().take(self.rows) {
            writeln!(
                out,
                "  - {}: {:.1}% ({}/{})",
                stat.artist,
                stat.skip_rate * 100.0,
                stat.skipped,
                stat.plays
            )?;
        }
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    /// The summary as a string.
    pub fn render_to_string(&self, report: &StatsReport) -> Result<String> {
        let mut buf = Vec::new();
        self.render(report, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn metric_label(group: &AggregateGroup, sort: SortMode) -> String {
    match sort {
        SortMode::Plays => format!("{} plays", group.plays),
        SortMode::Duration => format!("{:.2} h", ms_to_hours(group.total_ms)),
    }
}
