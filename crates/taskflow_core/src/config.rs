//! Engine and logging configuration.
//!
//! # Responsibility
//! - Hold tunables with defaults matching the board's observed behavior.
//! - Load overrides from a JSON file and validate them.
//!
//! # Invariants
//! - A validated `EngineConfig` has a non-blank slot key and a history
//!   limit of at least 1.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SLOT_KEY: &str = "taskflow-data";
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_NOTICE_TTL_MS: u64 = 4_000;

/// Mutation engine tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Durable slot key the board is saved under.
    pub slot_key: String,
    /// Maximum number of undo records kept.
    pub history_limit: usize,
    /// Debounce window for autosaved task edits.
    pub autosave_delay_ms: u64,
    /// How long views should keep a notice on screen.
    pub notice_ttl_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
        }
    }
}

impl EngineConfig {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_key.trim().is_empty() {
            return Err(ConfigError::Invalid("engine.slot_key must not be blank".to_string()));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "engine.history_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// File logging settings. Logging stays off without `log_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Top-level configuration file shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskflowConfig {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

impl TaskflowConfig {
    /// Parses and validates JSON configuration text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Configuration could not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig, TaskflowConfig};
    use std::time::Duration;

    #[test]
    fn defaults_match_board_behavior() {
        let config = EngineConfig::default();
        assert_eq!(config.slot_key, "taskflow-data");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.autosave_delay(), Duration::from_millis(1_000));
        assert_eq!(config.notice_ttl(), Duration::from_millis(4_000));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config =
            TaskflowConfig::from_json_str(r#"{"engine":{"history_limit":10}}"#).unwrap();
        assert_eq!(config.engine.history_limit, 10);
        assert_eq!(config.engine.autosave_delay_ms, 1_000);
        assert_eq!(config.logging.log_dir, None);
    }

    #[test]
    fn zero_history_limit_is_invalid() {
        let err = TaskflowConfig::from_json_str(r#"{"engine":{"history_limit":0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
