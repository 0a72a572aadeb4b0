//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```yaml
//! max_digits: 12
//! error_clear_delay_ms: 2000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable limits and timings for an [`ExpressionEngine`](crate::engine::ExpressionEngine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum characters in an operand being typed
    pub max_digits: usize,
    /// Maximum number of history entries kept
    pub history_limit: usize,
    /// Delay before the error display clears itself
    pub error_clear_delay_ms: u64,
    /// How long a transient notice should stay visible
    pub notice_duration_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_digits: 15,
            history_limit: 100,
            error_clear_delay_ms: 1500,
            notice_duration_ms: 2500,
        }
    }
}

impl EngineConfig {
    /// Parses a config from YAML.
    ///
    /// # Errors
    /// Returns error if the YAML is invalid or a value is out of range.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_digits == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_digits",
                reason: "must be at least 1".into(),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history_limit",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Delay before the error display clears itself
    #[must_use]
    pub fn error_clear_delay(&self) -> Duration {
        Duration::from_millis(self.error_clear_delay_ms)
    }

    /// How long a transient notice should stay visible
    #[must_use]
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

/// Errors that can occur while loading a config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {message}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// YAML is malformed or has the wrong shape
    #[error("Failed to parse YAML: {0}")]
    ParseError(String),

    /// A value is out of range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
