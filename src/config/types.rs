//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::logging::LoggingConfig;
use super::session::SessionConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bootstrap behaviour.
    #[serde(default)]
    pub session: SessionConfig,
    /// Log filter and format.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Prometheus metrics.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Transport script for the replay binary.
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Register metrics and print them in text format at exit.
    #[serde(default)]
    pub enabled: bool,
}

/// Replay configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayConfig {
    /// JSON-lines file of transport events. A path given on the command line
    /// takes precedence.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

pub(super) fn default_true() -> bool {
    true
}
