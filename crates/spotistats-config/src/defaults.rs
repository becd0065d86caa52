//! Default values, including the built-in style registry.

use crate::schema::*;
use std::path::PathBuf;

/// Default length of the top artists and top tracks views.
pub const DEFAULT_TOP_N: usize = 20;

/// Default rows per console section.
pub const DEFAULT_CONSOLE_ROWS: usize = 10;

/// Default export directory.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Timestamp fields of the known export schemas, most specific first.
pub const DEFAULT_TIMESTAMP_FIELDS: &[&str] = &["ts", "timestamp", "endTime", "startTime"];

/// The style registry shipped with the tool.
#[must_use]
pub fn builtin_style_rules() -> Vec<StyleRuleConfig> {
    vec![
        StyleRuleConfig::new(
            "rap-fr",
            &[
                "gazo", "sdm", "plk", "damso", "werenoi", "ninho", "dinos", "booba", "laylow",
                "josman", "kerchak",
            ],
        ),
        StyleRuleConfig::new(
            "lofi",
            &[
                "lofi",
                "nightcore",
                "Closed on Sunday",
                "Sad Gatomon",
                "kisa",
                "Kioshi",
                "Linearwave",
                "Jordy Chandra",
            ],
        ),
        StyleRuleConfig::new(
            "hardstyle",
            &[
                "hardstyle",
                "SICK LEGEND",
                r"BAKI\b",
                "PXSEIDON",
                "crypvolk",
                "Venko",
            ],
        ),
        StyleRuleConfig::new(
            "kpop-jpop",
            &[r"k/da", "yoasobi", r"\bado\b", r"\blisa\b", "rosé", r"eve\b"],
        ),
        StyleRuleConfig::new(
            "pop-indie",
            &[
                "Noah Kahan",
                "JVKE",
                "The Neighbourhood",
                "Lord Huron",
                "Mitski",
                "Suki Waterhouse",
            ],
        ),
    ]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            timestamp_fields: DEFAULT_TIMESTAMP_FIELDS
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
            styles: builtin_style_rules(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            csv: true,
            html: true,
            console_rows: DEFAULT_CONSOLE_ROWS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: spotistats_common::LogFormat::default(),
            file: None,
        }
    }
}
