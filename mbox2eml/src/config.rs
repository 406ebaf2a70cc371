//! Configuration for mbox2eml

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::eml::LineEnding;
use crate::error::{Mbox2EmlError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Level or filter directive (e.g., "info", "mbox2eml=debug")
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Conversion settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Line terminators written to .eml files
    #[serde(default)]
    pub line_ending: LineEnding,
    /// Log progress every N messages (0 = never)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_progress_interval() -> usize {
    500
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::default(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Mbox2EmlError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;

        toml::from_str(&content).map_err(|e| Mbox2EmlError::Config(e.to_string()))
    }
}
