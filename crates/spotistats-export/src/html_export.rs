//! Self-contained HTML report with charts.
//!
//! The page is built with `format!` around a few constant fragments, without
//! a template engine. The report views are embedded as one JSON object and
//! drawn client-side by Chart.js, loaded from a CDN. Without JavaScript the
//! page still shows the filters and totals.

use serde::Serialize;
use spotistats_common::{Result, SortMode, StatsError};
use spotistats_config::ExportConfig;
use spotistats_engine::{AggregateGroup, SkipStat, StatsReport, Totals};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// HTML report file.
pub const REPORT_FILE: &str = "report.html";

/// Artists shown in the skip rate chart.
pub const SKIP_CHART_ROWS: usize = 20;

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

const STYLES: &str = r"
    body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 0 auto; padding: 0 16px; color: #212529; }
    .grid { display: grid; grid-template-columns: 1fr; gap: 24px; }
    @media (min-width: 900px) { .grid { grid-template-columns: 1fr 1fr; } }
    .card { padding: 8px; border: 1px solid #eee; border-radius: 8px; background: #fff; }
    .meta { font-size: 14px; color: #666; margin-bottom: 16px; }
    canvas { width: 100%; }
";

const CHARTS_JS: &str = r"
    const hours = (ms) => ms / 3600000;
    const byPlays = DATA.sort === 'plays';
    const metricLabel = byPlays ? 'Plays' : 'Hours';
    const valueFor = (item) => byPlays ? item.plays : hours(item.total_ms);

    function chart(id, type, labels, data, label, color) {
      return new Chart(document.getElementById(id), {
        type,
        data: { labels, datasets: [{ label, data, backgroundColor: color, borderColor: color, fill: type === 'line', tension: 0.2 }] },
        options: {
          responsive: true,
          plugins: { legend: { display: false } },
          scales: { y: { beginAtZero: true } }
        }
      });
    }

    if (window.Chart) {
      chart('chart-artists', 'bar', DATA.top_artists.map(a => a.artist), DATA.top_artists.map(valueFor), metricLabel, '#495057');
      chart('chart-tracks', 'bar', DATA.top_tracks.map(t => t.artist + ' — ' + t.track), DATA.top_tracks.map(valueFor), metricLabel, '#0b7285');
      chart('chart-days', 'line', DATA.days.map(d => d.key), DATA.days.map(d => hours(d.total_ms)), 'Hours per day', '#1c7ed6');
      chart('chart-skips', 'bar', DATA.skip_rates.map(s => s.artist), DATA.skip_rates.map(s => +(s.skip_rate * 100).toFixed(2)), 'Skip %', '#c92a2a');
    }
";

/// Views embedded in the page for the chart script.
#[derive(Serialize)]
struct ChartData<'a> {
    sort: SortMode,
    totals: &'a Totals,
    top_artists: &'a [AggregateGroup],
    top_tracks: &'a [AggregateGroup],
    days: &'a [AggregateGroup],
    skip_rates: &'a [SkipStat],
}

impl<'a> ChartData<'a> {
    fn new(report: &'a StatsReport) -> Self {
        let skips = report.skip_rates.len().min(SKIP_CHART_ROWS);
        Self {
            sort: report.criteria.sort,
            totals: &report.totals,
            top_artists: &report.top_artists,
            top_tracks: &report.top_tracks,
            days: &report.days,
            skip_rates: &report.skip_rates[..skips],
        }
    }
}

/// Writes `report.html` for a report.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    dir: PathBuf,
}

impl HtmlExporter {
    /// Exporter writing into `dir`, created on first export.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Exporter for the configured export directory.
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.dir.clone())
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Renders the page.
    pub fn render(&self, report: &StatsReport) -> Result<String> {
        let data = script_json(&ChartData::new(report))?;
        let totals = &report.totals;
        let sort = report.criteria.sort;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Spotify Stats Report</title>
    <style>{STYLES}</style>
</head>
<body>
    <h1>Spotify Stats</h1>
    <p class="meta">
        Filters: {filters}<br>
        Total plays: <strong>{plays}</strong>,
        total time: <strong>{hours:.2} h</strong>,
        skipped: <strong>{skipped}</strong> ({skip_pct:.1}%)
    </p>
    <div class="grid">
        <section class="card"><h3>Top artists ({sort})</h3><canvas id="chart-artists" height="300"></canvas></section>
        <section class="card"><h3>Top tracks ({sort})</h3><canvas id="chart-tracks" height="300"></canvas></section>
        <section class="card"><h3>Listening per day</h3><canvas id="chart-days" height="300"></canvas></section>
        <section class="card"><h3>Skip rate by artist</h3><canvas id="chart-skips" height="300"></canvas></section>
    </div>
    <script src="{CHART_JS_URL}"></script>
    <script>
    const DATA = {data};
{CHARTS_JS}
    </script>
</body>
</html>
"#,
            filters = html_escape(&report.criteria.to_string()),
            plays = totals.plays,
            hours = totals.hours(),
            skipped = totals.skipped_count,
            skip_pct = totals.skip_ratio() * 100.0,
        ))
    }

    /// Writes the page, returning its path. An existing file is overwritten.
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn export(&self, report: &StatsReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            StatsError::export_with_source(
                format!("cannot create export directory {}", self.dir.display()),
                e,
            )
        })?;

        let html = self.render(report)?;
        let path = self.dir.join(REPORT_FILE);
        fs::write(&path, &html).map_err(|e| {
            StatsError::export_with_source(format!("cannot write {}", path.display()), e)
        })?;

        debug!(bytes = html.len(), "Rendered HTML report");
        info!(path = %path.display(), "Exported HTML report");
        Ok(path)
    }
}

/// Serializes `value` for inline use in a `<script>` element.
///
/// `<` only occurs inside JSON strings, so escaping it as `\u003c` keeps the
/// value intact and the element cannot be closed early.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Escape HTML special characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
