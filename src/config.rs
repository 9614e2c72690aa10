//! Configuration management for stacklens
//!
//! Settings load from environment variables with sensible defaults.
//! Command-line flags override whatever is read here.
//!
//! # Environment Variables
//!
//! - `STACKLENS_STACKFILE`: Stackfile name relative to the repository root - default: ".stack"
//! - `STACKLENS_LOG_LEVEL`: Logging level - default: "warn"
//! - `STACKLENS_LOG_JSON`: Emit JSON log lines (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use stacklens::StacklensConfig;
//! use std::path::Path;
//!
//! let config = StacklensConfig::default();
//! config.validate().expect("Invalid configuration");
//!
//! let stackfile = config.stackfile_path(Path::new("/path/to/repo"));
//! ```

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_STACKFILE_NAME: &str = ".stack";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_LOG_JSON: bool = false;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StacklensConfig {
    /// Stackfile location relative to the repository root
    pub stackfile_name: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON log lines instead of pretty console output
    pub log_json: bool,
}

impl Default for StacklensConfig {
    /// Loads configuration from `STACKLENS_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    fn default() -> Self {
        let stackfile_name = env::var("STACKLENS_STACKFILE")
            .unwrap_or_else(|_| DEFAULT_STACKFILE_NAME.to_string());

        let log_level = env::var("STACKLENS_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("STACKLENS_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_LOG_JSON);

        Self {
            stackfile_name,
            log_level,
            log_json,
        }
    }
}

impl StacklensConfig {
    /// Loads configuration like [`Default`], but rejects an unparsable
    /// `STACKLENS_LOG_JSON` instead of ignoring it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("STACKLENS_LOG_JSON") {
            config.log_json = raw.parse::<bool>().map_err(|e| ConfigError::ParseError {
                field: "STACKLENS_LOG_JSON".to_string(),
                error: e.to_string(),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    ///
    /// Checks that:
    /// - The Stackfile name is a non-empty relative path
    /// - Log level is valid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stackfile_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Stackfile name cannot be empty".to_string(),
            ));
        }
        if Path::new(&self.stackfile_name).is_absolute() {
            return Err(ConfigError::ValidationFailed(format!(
                "Stackfile name must be relative to the repository root: {}",
                self.stackfile_name
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Location of the Stackfile for a repository rooted at `repo_root`.
    pub fn stackfile_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.stackfile_name)
    }
}
