//! Logging types shared between the session logger and its consumers.

use serde::{Deserialize, Serialize};

/// Severity levels for session log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

/// Configuration for a session logger.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level written to the log.
    #[serde(default)]
    pub level: LogLevel,
}

/// Callback delivering log lines to the host UI.
pub type HostLogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync>;

/// Visual prefixes for notable message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    Warning,
    Error,
    Success,
    Section,
}

impl MessagePrefix {
    /// Prepend this prefix to a message.
    pub fn format(&self, message: &str) -> String {
        match self {
            MessagePrefix::Warning => format!("[WARNING] {}", message),
            MessagePrefix::Error => format!("[ERROR] {}", message),
            MessagePrefix::Success => format!("[OK] {}", message),
            MessagePrefix::Section => format!("--- {} ---", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn prefixes_format() {
        assert_eq!(MessagePrefix::Section.format("Seeding"), "--- Seeding ---");
        assert_eq!(MessagePrefix::Error.format("boom"), "[ERROR] boom");
    }
}
