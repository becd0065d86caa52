//! Integration tests for the spotistats binary crate.
//!
//! These tests run the whole tool against export files on disk.

use clap::Parser;
use serde_json::{json, Value};
use spotistats::{discover_inputs, load_settings, run, AppError, Args};
use spotistats_common::test_utils::{init_test_logging, records::{legacy_play, play, skipped_play}};
use spotistats_config::Config;
use std::fs;
use std::path::Path;

fn write_export(dir: &Path, name: &str, records: &[Value]) {
    fs::write(dir.join(name), serde_json::to_string_pretty(records).unwrap()).unwrap();
}

fn args(extra: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("spotistats").chain(extra.iter().copied())).unwrap()
}

fn config_for(out: &Path) -> Config {
    let mut config = Config::default();
    config.export.dir = out.to_path_buf();
    config
}

#[test]
fn test_overlapping_exports_are_merged() {
    init_test_logging();

    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let shared = play("2024-03-01T20:00:00Z", "spotify:track:1", "Damso", "Macarena", 200_000);

    write_export(
        input.path(),
        "Streaming_History_Audio_2024_0.json",
        &[shared.clone(), skipped_play("2024-03-02T20:00:00Z", "spotify:track:2", "Ninho", "Jefe", 3_000)],
    );
    write_export(
        input.path(),
        "Streaming_History_Audio_2024_1.JSON",
        &[shared, play("2024-03-03T20:00:00Z", "spotify:track:3", "Mitski", "Nobody", 150_000)],
    );
    fs::write(input.path().join("notes.txt"), "not an export").unwrap();

    let args = args(&[input.path().to_str().unwrap()]);
    let mut stdout = Vec::new();
    let outcome = run(&args, &config_for(out.path()), &mut stdout).unwrap();

    assert_eq!(outcome.inputs.len(), 2);
    assert_eq!(outcome.report.counts.records, 4);
    assert_eq!(outcome.report.totals.plays, 3);
    assert_eq!(outcome.exported.len(), 5);
    assert!(out.path().join("skip_rates.csv").exists());
    let html = fs::read_to_string(out.path().join("report.html")).unwrap();
    assert!(html.contains("Total plays: <strong>3</strong>"));

    let text = String::from_utf8(stdout).unwrap();
    assert!(text.contains("Total plays:        3"));
    assert!(text.contains("  - Damso: "));
}

#[test]
fn test_filters_and_no_csv() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_export(
        input.path(),
        "history.json",
        &[
            play("2023-12-31T23:59:59Z", "spotify:track:1", "Damso", "A", 1_000),
            play("2024-01-01T00:00:00Z", "spotify:track:2", "Damso", "B", 1_000),
            play("2024-01-01T00:10:00Z", "spotify:track:3", "Damso ft. X", "C", 1_000),
            legacy_play("2024-02-01 12:00", "damso", "D", 1_000),
        ],
    );

    let file = input.path().join("history.json");
    let args = args(&[
        file.to_str().unwrap(),
        "--artist",
        "DAMSO",
        "--year",
        "2024",
        "--sort",
        "plays",
        "--no-csv",
        "--no-html",
    ]);
    let mut config = config_for(out.path());
    config.export.csv = !args.no_csv;
    config.export.html = !args.no_html;

    let mut stdout = Vec::new();
    let outcome = run(&args, &config, &mut stdout).unwrap();

    assert_eq!(outcome.report.totals.plays, 2);
    assert!(outcome.exported.is_empty());
    assert!(!out.path().join("plays_by_day.csv").exists());
    assert!(!out.path().join("report.html").exists());
    let text = String::from_utf8(stdout).unwrap();
    assert!(text.contains("Filters: artist=DAMSO, year=2024, style=ALL, sort=plays"));
}

#[test]
fn test_no_json_files() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("readme.md"), "# nothing").unwrap();

    let args = args(&[input.path().to_str().unwrap(), "/definitely/missing.json"]);
    let err = run(&args, &Config::default(), &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, AppError::NoInputFiles));
    assert_eq!(err.to_string(), "no JSON input files found");
}

#[test]
fn test_nothing_to_aggregate() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("empty.json"), "").unwrap();
    fs::write(input.path().join("object.json"), "{\"not\": \"an array\"}").unwrap();
    fs::write(input.path().join("array.json"), "[]").unwrap();

    let args = args(&[input.path().to_str().unwrap()]);
    let err = run(&args, &Config::default(), &mut Vec::<u8>::new()).unwrap_err();
    assert_eq!(err.to_string(), "nothing to aggregate");
}

#[test]
fn test_discovery_order_and_dedup() {
    let input = tempfile::tempdir().unwrap();
    for name in ["b.json", "a.json", "c.Json"] {
        fs::write(input.path().join(name), "[]").unwrap();
    }
    fs::create_dir(input.path().join("nested")).unwrap();
    fs::write(input.path().join("nested").join("d.json"), "[]").unwrap();

    let a = input.path().join("a.json");
    let files = discover_inputs(&[a.clone(), input.path().to_path_buf()]).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.json", "b.json", "c.Json"]);
}

#[test]
fn test_settings_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("spotistats.yaml");
    fs::write(&config_path, "engine:\n  top_n: 3\nexport:\n  console_rows: 2\n").unwrap();

    let args = args(&[
        "x.json",
        "--config",
        config_path.to_str().unwrap(),
        "--out",
        "/tmp/elsewhere",
        "--log-level",
        "debug",
        "--no-csv",
        "--no-html",
    ]);
    let config = load_settings(&args).unwrap();
    assert_eq!(config.engine.top_n, 3);
    assert_eq!(config.export.console_rows, 2);
    assert_eq!(config.export.dir, Path::new("/tmp/elsewhere"));
    assert_eq!(config.logging.level, "debug");
    assert!(!config.export.csv);
    assert!(!config.export.html);
}

#[test]
fn test_export_with_bom_and_junk() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let body = serde_json::to_string(&json!([
        {"ts": "2024-05-05T05:05:05Z", "spotify_track_uri": "spotify:track:9", "ms_played": 1000}
    ]))
    .unwrap();
    fs::write(input.path().join("bom.json"), format!("\u{feff}{body}\n")).unwrap();

    let args = args(&[input.path().to_str().unwrap()]);
    let outcome = run(&args, &config_for(out.path()), &mut Vec::<u8>::new()).unwrap();
    assert_eq!(outcome.report.totals.plays, 1);
    assert_eq!(outcome.report.days[0].key, "2024-05-05");
}

#[test]
fn test_non_utf8_file_does_not_abort_run() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_export(
        input.path(),
        "a.json",
        &[play("2024-03-01T20:00:00Z", "spotify:track:1", "Damso", "Macarena", 200_000)],
    );
    fs::write(input.path().join("b.json"), [0xFF, 0xFE, b'[', 0xFF, b']']).unwrap();

    let args = args(&[input.path().to_str().unwrap(), "--no-csv"]);
    let outcome = run(&args, &config_for(out.path()), &mut Vec::<u8>::new()).unwrap();
    assert_eq!(outcome.inputs.len(), 2);
    assert_eq!(outcome.report.totals.plays, 1);
    assert_eq!(outcome.report.top_artists[0].artist, "Damso");
}

#[test]
fn test_invalid_config_is_user_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("spotistats.yaml");
    fs::write(&config_path, "export:\n  console_rows: 0\n").unwrap();

    let args = args(&["x.json", "--config", config_path.to_str().unwrap()]);
    let err = load_settings(&args).unwrap_err();
    assert!(err.is_user_error());
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("export.console_rows"), "{err}");
}
