//! CSV export of a report into a directory.

use serde::Serialize;
use spotistats_common::{ms_to_hours, ms_to_minutes, round_to, Result, StatsError};
use spotistats_config::ExportConfig;
use spotistats_engine::{AggregateGroup, SkipStat, StatsReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Top artists file.
pub const ARTISTS_FILE: &str = "plays_by_artist.csv";
/// Top tracks file.
pub const TRACKS_FILE: &str = "plays_by_track.csv";
/// Per-day file.
pub const DAYS_FILE: &str = "plays_by_day.csv";
/// Skip rates file.
pub const SKIP_RATES_FILE: &str = "skip_rates.csv";

const ARTIST_HEADERS: &[&str] = &["artist", "plays", "ms", "minutes", "hours"];
const TRACK_HEADERS: &[&str] = &["artist", "track", "plays", "ms", "minutes", "hours"];
const DAY_HEADERS: &[&str] = &["day", "plays", "ms", "minutes", "hours"];
const SKIP_HEADERS: &[&str] = &["artist", "plays", "skipped", "skip_rate"];

#[derive(Serialize)]
struct ArtistRow<'a> {
    artist: &'a str,
    plays: u64,
    ms: u64,
    minutes: f64,
    hours: f64,
}

#[derive(Serialize)]
struct TrackRow<'a> {
    artist: &'a str,
    track: &'a str,
    plays: u64,
    ms: u64,
    minutes: f64,
    hours: f64,
}

#[derive(Serialize)]
struct DayRow<'a> {
    day: &'a str,
    plays: u64,
    ms: u64,
    minutes: f64,
    hours: f64,
}

#[derive(Serialize)]
struct SkipRow<'a> {
    artist: &'a str,
    plays: u64,
    skipped: u64,
    skip_rate: f64,
}

fn minutes(ms: u64) -> f64 {
    round_to(ms_to_minutes(ms), 2)
}

fn hours(ms: u64) -> f64 {
    round_to(ms_to_hours(ms), 2)
}

impl<'a> From<&'a AggregateGroup> for ArtistRow<'a> {
    fn from(g: &'a AggregateGroup) -> Self {
        Self {
            artist: &g.artist,
            plays: g.plays,
            ms: g.total_ms,
            minutes: minutes(g.total_ms),
            hours: hours(g.total_ms),
        }
    }
}

impl<'a> From<&'a AggregateGroup> for TrackRow<'a> {
    fn from(g: &'a AggregateGroup) -> Self {
        Self {
            artist: &g.artist,
            track: &g.track,
            plays: g.plays,
            ms: g.total_ms,
            minutes: minutes(g.total_ms),
            hours: hours(g.total_ms),
        }
    }
}

impl<'a> From<&'a AggregateGroup> for DayRow<'a> {
    fn from(g: &'a AggregateGroup) -> Self {
        Self {
            day: &g.key,
            plays: g.plays,
            ms: g.total_ms,
            minutes: minutes(g.total_ms),
            hours: hours(g.total_ms),
        }
    }
}

impl<'a> From<&'a SkipStat> for SkipRow<'a> {
    fn from(s: &'a SkipStat) -> Self {
        Self {
            artist: &s.artist,
            plays: s.plays,
            skipped: s.skipped,
            skip_rate: round_to(s.skip_rate, 4),
        }
    }
}

/// Writes the four CSV views of a report.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
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

    /// Writes every file, returning the paths written.
    ///
    /// Existing files are overwritten.
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn export(&self, report: &StatsReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            StatsError::export_with_source(
                format!("cannot create export directory {}", self.dir.display()),
                e,
            )
        })?;

        let written = vec![
            self.write(
                ARTISTS_FILE,
                ARTIST_HEADERS,
                report.top_artists.iter().map(ArtistRow::from),
            )?,
            self.write(
                TRACKS_FILE,
                TRACK_HEADERS,
                report.top_tracks.iter().map(TrackRow::from),
            )?,
            self.write(DAYS_FILE, DAY_HEADERS, report.days.iter().map(DayRow::from))?,
            self.write(
                SKIP_RATES_FILE,
                SKIP_HEADERS,
                report.skip_rates.iter().map(SkipRow::from),
            )?,
        ];

        info!(files = written.len(), "Exported CSV files");
        Ok(written)
    }

    // Headers are written by hand so that an empty view still gets one.
    fn write<R, I>(&self, name: &str, headers: &[&str], rows: I) -> Result<PathBuf>
    where
        R: Serialize,
        I: IntoIterator<Item = R>,
    {
        let path = self.dir.join(name);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(headers)?;
        let mut count = 0_usize;
        for row in rows {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush()?;
        debug!(path = %path.display(), rows = count, "Wrote CSV file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        let group = AggregateGroup {
            plays: 1,
            total_ms: 5_007_123,
            ..AggregateGroup::new("a", "A", "")
        };
        let row = ArtistRow::from(&group);
        assert!((row.minutes - 83.45).abs() < 1e-9);
        assert!((row.hours - 1.39).abs() < 1e-9);

        let stat = SkipStat {
            plays: 3,
            skipped: 2,
            skip_rate: 2.0 / 3.0,
            ..SkipStat::new("a", "A")
        };
        assert!((SkipRow::from(&stat).skip_rate - 0.6667).abs() < 1e-9);
    }

    #[test]
    fn test_header_only_for_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path().join("nested"));
        let written = exporter.export(&StatsReport::default()).unwrap();
        assert_eq!(written.len(), 4);

        let content = fs::read_to_string(exporter.dir().join(SKIP_RATES_FILE)).unwrap();
        assert_eq!(content, "artist,plays,skipped,skip_rate\n");
    }
}
