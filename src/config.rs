//! Runboard Configuration Module
//!
//! Config is stored in `~/.config/runboard/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Command line flags
//! 2. Environment variables (`RUNBOARD_RUNS_FILE`, `RUNBOARD_PAGE_SIZE`)
//! 3. Config file
//! 4. Defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RunboardError};

pub const ENV_RUNS_FILE: &str = "RUNBOARD_RUNS_FILE";
pub const ENV_PAGE_SIZE: &str = "RUNBOARD_PAGE_SIZE";

const DEFAULT_PAGE_SIZE: usize = 50;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunboardConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub runs: RunsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Runs requested per query
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Show start times in UTC instead of local time
    #[serde(default)]
    pub utc: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            utc: false,
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunsConfig {
    /// Run file opened when none is given on the command line
    pub default_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log file for the interactive view
    pub file: Option<PathBuf>,
}

impl RunboardConfig {
    /// Returns `~/.config/runboard/` on Unix, `%APPDATA%/runboard/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("runboard")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the default location
    ///
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| RunboardError::Config {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| RunboardError::Config {
            reason: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Merge with environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// Merge with variables from `lookup`; empty values are ignored
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(file) = get(ENV_RUNS_FILE) {
            self.runs.default_file = Some(PathBuf::from(file));
        }

        if let Some(raw) = get(ENV_PAGE_SIZE) {
            self.display.page_size = raw.parse().map_err(|_| RunboardError::Config {
                reason: format!(
                    "{} must be a non-negative integer (0 = unlimited), got '{}'",
                    ENV_PAGE_SIZE, raw
                ),
            })?;
        }

        Ok(self)
    }

    /// Query limit; a page size of 0 means unlimited
    pub fn limit(&self) -> Option<usize> {
        match self.display.page_size {
            0 => None,
            n => Some(n),
        }
    }
}
