//! Integration tests for spotistats-config crate.

use spotistats_config::{Config, ConfigLoader, ConfigValidator, LoggingSettings, StyleRuleConfig};
use spotistats_common::LogFormat;
use std::io::Write;

#[test]
fn test_default_config_validation() {
    let config = Config::default();
    assert!(ConfigValidator::validate(&config).is_ok());
    assert_eq!(config.engine.top_n, 20);
    assert!(config.export.csv);
}

#[test]
fn test_full_yaml_config() {
    let yaml = r#"
engine:
  top_n: 15
  timestamp_fields: ["ts", "endTime"]
  styles:
    - tag: rap-fr
      patterns: ["damso", "ninho"]
    - tag: jazz
      patterns: ["coltrane"]
export:
  dir: out
  csv: false
  html: false
  console_rows: 5
logging:
  level: debug
  format: pretty
"#;
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = ConfigLoader::load_config(file.path()).unwrap();
    assert_eq!(config.engine.top_n, 15);
    assert_eq!(config.engine.timestamp_fields, ["ts", "endTime"]);
    assert_eq!(
        config.engine.styles[1],
        StyleRuleConfig::new("jazz", &["coltrane"])
    );
    assert!(!config.export.csv);
    assert!(!config.export.html);
    assert_eq!(config.export.console_rows, 5);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_invalid_pattern_fails_load() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(b"engine:\n  styles:\n    - tag: x\n      patterns: [\"[a-\"]\n")
        .unwrap();

    let err = ConfigLoader::load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid pattern"));
}

#[test]
fn test_logging_settings_conversion() {
    let settings = LoggingSettings {
        level: "info".to_string(),
        format: LogFormat::Plain,
        file: None,
    };
    let logging = settings.to_logging_config();
    assert_eq!(logging.level, "info");
    assert_eq!(logging.format, LogFormat::Plain);
    assert!(logging.file_path.is_none());
}

#[test]
fn test_config_serializes_back_to_yaml() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let back: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, config);
}
