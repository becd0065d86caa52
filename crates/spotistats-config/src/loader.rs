//! Configuration loading utilities

use crate::schema::Config;
use crate::validator::ConfigValidator;
use spotistats_common::{Result as StatsResult, StatsError};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SPOTISTATS_CONFIG_PATH";

/// Files looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["spotistats.yaml", "spotistats.yml", "spotistats.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    IoError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Unknown file extension
    #[error("Unsupported configuration format '{0}', expected .yaml, .yml or .toml")]
    UnsupportedFormat(String),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A style pattern failed to compile
    #[error("Invalid pattern '{pattern}' in style '{tag}': {source}")]
    Pattern {
        /// Style tag owning the pattern
        tag: String,
        /// Offending pattern
        pattern: String,
        /// Regex compile error
        #[source]
        source: regex::Error,
    },

    /// A value is out of range or inconsistent
    #[error("Invalid value for {field}: {message}")]
    Invalid {
        /// Dotted field path
        field: String,
        /// What is wrong
        message: String,
    },
}

impl From<ConfigError> for StatsError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { field, message } => {
                StatsError::validation_field(format!("{field} {message}"), field)
            }
            other => StatsError::config_with_source("could not load configuration", other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut config = Self::parse_file(path.as_ref())?;
        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from the environment, a default file, or defaults
    pub fn load() -> StatsResult<Config> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            return Ok(Self::load_config(config_path)?);
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            return Ok(Self::load_config(path)?);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, or fall back to [`ConfigLoader::load`]
    pub fn load_from(path: Option<&Path>) -> StatsResult<Config> {
        match path {
            Some(path) => Ok(Self::load_config(path)?),
            None => Self::load(),
        }
    }

    /// Parse a file by extension without overrides or validation
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let config = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(top_n) = lookup("SPOTISTATS_TOP_N") {
            config.engine.top_n = top_n.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: "SPOTISTATS_TOP_N".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Some(dir) = lookup("SPOTISTATS_EXPORT_DIR") {
            config.export.dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup("SPOTISTATS_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
