//! Runtime validation of a loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;
use regex::RegexBuilder;
use std::collections::HashSet;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first problem found.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.engine.top_n == 0 {
            return Err(ConfigError::Invalid {
                field: "engine.top_n".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if config
            .engine
            .timestamp_fields
            .iter()
            .all(|f| f.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                field: "engine.timestamp_fields".to_string(),
                message: "at least one field name is required".to_string(),
            });
        }

        let mut tags = HashSet::new();
        for rule in &config.engine.styles {
            if rule.tag.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "engine.styles.tag".to_string(),
                    message: "style tags cannot be empty".to_string(),
                });
            }
            if !tags.insert(rule.tag.as_str()) {
                return Err(ConfigError::Invalid {
                    field: "engine.styles.tag".to_string(),
                    message: format!("duplicate style tag '{}'", rule.tag),
                });
            }
            for pattern in &rule.patterns {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::Pattern {
                        tag: rule.tag.clone(),
                        pattern: pattern.clone(),
                        source,
                    })?;
            }
        }

        if config.export.console_rows == 0 {
            return Err(ConfigError::Invalid {
                field: "export.console_rows".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
