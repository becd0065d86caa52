//! Input discovery and reading of export files.

use serde_json::Value;
use spotistats_common::{Result, StatsError};
use spotistats_engine::RawRecord;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Expands `inputs` into the JSON files to read.
///
/// A directory contributes its `*.json` files sorted by name, without
/// descending into subdirectories. A file contributes itself. Paths that do
/// not exist are skipped with a warning, and each file is listed once.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let candidates = if input.is_dir() {
            json_files_in(input)?
        } else if input.is_file() {
            vec![input.clone()]
        } else {
            warn!(path = %input.display(), "Input path does not exist, skipping");
            continue;
        };

        for file in candidates {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    debug!(files = files.len(), "Discovered input files");
    Ok(files)
}

fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        StatsError::input_with_source(format!("cannot list directory {}", dir.display()), e)
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_json_extension(path))
        .collect();
    files.sort();
    Ok(files)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parses the records of one export file.
///
/// Only the text between the first `[` and the last `]` is parsed, which
/// tolerates byte-order marks and stray text around the array. Returns
/// `None` when the file holds no JSON array.
pub fn parse_records(content: &str) -> Option<Vec<RawRecord>> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(Value::Array(records)) => Some(records),
        _ => None,
    }
}

/// Reads one export file. Unparseable or empty files are skipped with a
/// warning.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing the
/// whole run.
#[instrument(fields(path = %path.display()))]
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let bytes = fs::read(path).map_err(|e| {
        StatsError::input_with_source(format!("cannot read {}", path.display()), e)
    })?;
    let content = String::from_utf8_lossy(&bytes);
    if matches!(content, Cow::Owned(_)) {
        warn!("File is not valid UTF-8, decoding lossily");
    }

    match parse_records(&content) {
        Some(records) if records.is_empty() => {
            warn!("Export file holds an empty array, skipping file");
            Ok(records)
        }
        Some(records) => {
            debug!(records = records.len(), "Read export file");
            Ok(records)
        }
        None => {
            warn!("No JSON array found, skipping file");
            Ok(Vec::new())
        }
    }
}

/// Reads and concatenates the records of every file, in order.
pub fn load_records(files: &[PathBuf]) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    for file in files {
        records.extend(read_records(file)?);
    }
    info!(files = files.len(), records = records.len(), "Loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_trims_surroundings() {
        let records = parse_records("\u{feff}garbage [{\"ts\": \"x\"}, 3] trailing").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_records_rejects_non_arrays() {
        assert!(parse_records("").is_none());
        assert!(parse_records("{\"a\": 1}").is_none());
        assert!(parse_records("] [").is_none());
        assert!(parse_records("[1, 2").is_none());
        assert!(parse_records("[not json]").is_none());
    }

    #[test]
    fn test_parse_empty_array() {
        assert_eq!(parse_records("[]"), Some(Vec::new()));
    }

    #[test]
    fn test_read_records_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.json");
        let mut bytes = b"[{\"ts\": \"2024-01-01T00:00:00Z\", \"master_metadata_album_artist_name\": \"Beyonc".to_vec();
        bytes.extend_from_slice(&[0xE9, 0xFF]);
        bytes.extend_from_slice(b"\"}]");
        fs::write(&path, bytes).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        let artist = records[0]["master_metadata_album_artist_name"].as_str().unwrap();
        assert!(artist.starts_with("Beyonc"));
        assert!(artist.contains('\u{fffd}'));
    }

    #[test]
    fn test_read_records_empty_array_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();
        assert!(read_records(&path).unwrap().is_empty());

        let err = read_records(&dir.path().join("gone.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_json_extension_case_insensitive() {
        assert!(has_json_extension(Path::new("a/Streaming_History_Audio_2024.JSON")));
        assert!(has_json_extension(Path::new("b.json")));
        assert!(!has_json_extension(Path::new("c.json.bak")));
        assert!(!has_json_extension(Path::new("json")));
    }
}
