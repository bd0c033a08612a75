//! Settings struct with TOML-based sections.
//!
//! Sections map to TOML tables and can be updated independently, so a
//! host changing one engine default does not rewrite unrelated tables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::EngineParameters;
use crate::logging::{LogConfig, LogLevel};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Engine data handling and parameter defaults.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Deferred bootstrap behavior.
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
}

impl Settings {
    /// Session-logger configuration derived from the logging section.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.logging.level,
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for session log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written to session logs.
    #[serde(default)]
    pub level: LogLevel,
}

/// Engine-facing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Whether the host supplies DWI data already normalized.
    #[serde(default)]
    pub normalized_dwi: bool,

    /// Parameter values a fresh engine starts from.
    #[serde(default)]
    pub defaults: EngineParameters,
}

/// Deferred-bootstrap settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// How long to wait for the host to deliver an engine.
    #[serde(default = "default_bootstrap_timeout")]
    pub timeout_secs: u64,
}

fn default_bootstrap_timeout() -> u64 {
    30
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_bootstrap_timeout(),
        }
    }
}

impl BootstrapSettings {
    /// The timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Identifies a settings section for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Logging,
    Engine,
    Bootstrap,
}

impl ConfigSection {
    /// TOML table name of this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Engine => "engine",
            ConfigSection::Bootstrap => "bootstrap",
        }
    }
}
