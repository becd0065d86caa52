//! Integration tests for spotistats-export crate.
//!
//! These tests render reports produced by the real engine.

use spotistats_common::test_utils::{init_test_logging, records::play, records::skipped_play};
use spotistats_common::{FilterCriteria, SortMode};
use spotistats_config::{Config, EngineConfig};
use spotistats_engine::{StatsEngine, StatsReport};
use spotistats_export::{
    ConsoleSummary, CsvExporter, HtmlExporter, ARTISTS_FILE, DAYS_FILE, REPORT_FILE,
    SKIP_RATES_FILE, TRACKS_FILE,
};
use std::fs;

fn report(sort: SortMode) -> StatsReport {
    let records = vec![
        play("2024-01-01T10:00:00Z", "spotify:track:1", "Lord Huron", "The Night We Met", 3_600_000),
        play("2024-01-01T11:00:00Z", "spotify:track:2", "Booba, Damso", "Pitbull, \"remix\"", 60_000),
        skipped_play("2024-01-02T09:00:00Z", "spotify:track:2", "Booba, Damso", "Pitbull, \"remix\"", 2_000),
        play("garbage", "spotify:track:3", "Mitski", "Nobody", 120_000),
    ];
    StatsEngine::from_config(&EngineConfig::default())
        .unwrap()
        .run(&records, &FilterCriteria::new(), sort)
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_csv_files_match_report() {
    init_test_logging();

    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let written = exporter.export(&report(SortMode::Duration)).unwrap();
    assert_eq!(written.len(), 4);

    let artists = read_rows(&dir.path().join(ARTISTS_FILE));
    assert_eq!(artists[0], ["artist", "plays", "ms", "minutes", "hours"]);
    assert_eq!(artists[1], ["Lord Huron", "1", "3600000", "60.0", "1.0"]);
    assert_eq!(artists.len(), 4);

    let tracks = read_rows(&dir.path().join(TRACKS_FILE));
    assert_eq!(tracks[0], ["artist", "track", "plays", "ms", "minutes", "hours"]);
    assert_eq!(tracks[3][0], "Booba, Damso");
    assert_eq!(tracks[3][1], "Pitbull, \"remix\"");
    assert_eq!(tracks[3][2], "2");

    let days = read_rows(&dir.path().join(DAYS_FILE));
    let keys: Vec<_> = days.iter().skip(1).map(|r| r[0].as_str()).collect();
    assert_eq!(keys, ["2024-01-01", "2024-01-02", "unknown"]);

    let skips = read_rows(&dir.path().join(SKIP_RATES_FILE));
    assert_eq!(skips[0], ["artist", "plays", "skipped", "skip_rate"]);
    assert_eq!(skips[1], ["Booba, Damso", "2", "1", "0.5"]);
}

#[test]
fn test_csv_quoting_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    CsvExporter::new(dir.path())
        .export(&report(SortMode::Plays))
        .unwrap();
    let raw = fs::read_to_string(dir.path().join(TRACKS_FILE)).unwrap();
    assert!(raw.contains("\"Booba, Damso\",\"Pitbull, \"\"remix\"\"\""));
}

#[test]
fn test_exporters_from_config() {
    let mut config = Config::default();
    config.export.console_rows = 1;
    let dir = tempfile::tempdir().unwrap();
    config.export.dir = dir.path().join("out");

    let exporter = CsvExporter::from_config(&config.export);
    assert_eq!(exporter.dir(), config.export.dir.as_path());
    exporter.export(&report(SortMode::Plays)).unwrap();
    assert!(config.export.dir.join(DAYS_FILE).exists());

    let text = ConsoleSummary::from_config(&config.export)
        .render_to_string(&report(SortMode::Plays))
        .unwrap();
    assert!(text.contains("  - Booba, Damso: 2 plays"));
    assert!(!text.contains("  - Lord Huron: 1 plays"));
}

#[test]
fn test_console_summary_from_engine() {
    let text = ConsoleSummary::default()
        .render_to_string(&report(SortMode::Duration))
        .unwrap();
    assert!(text.contains("Total plays:        4"));
    assert!(text.contains("Skipped plays:      1 (25.0%)"));
    assert!(text.contains("  - Lord Huron — The Night We Met: 1.00 h"));
    assert!(text.contains("Skip rates (worst first):\n  - Booba, Damso: 50.0% (1/2)"));
}

#[test]
fn test_html_report_from_engine() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.export.dir = dir.path().to_path_buf();

    let path = HtmlExporter::from_config(&config.export)
        .export(&report(SortMode::Plays))
        .unwrap();
    assert_eq!(path, dir.path().join(REPORT_FILE));

    let html = fs::read_to_string(path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Filters: artist=ALL, year=ALL, style=ALL, sort=plays"));
    assert!(html.contains("skipped: <strong>1</strong> (25.0%)"));
    assert!(html.contains(r#""artist":"Booba, Damso","track":"Pitbull, \"remix\"""#));
    assert!(html.contains(r#""key":"unknown""#));
}
