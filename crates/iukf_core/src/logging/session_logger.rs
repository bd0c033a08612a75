//! Per-session logger with file and host callback output.
//!
//! Each interactive session gets its own log file under the configured
//! logs folder; the same lines are forwarded to the host UI through an
//! optional callback.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{HostLogCallback, LogConfig, LogLevel, MessagePrefix};

/// Session logger with dual output (file + host callback).
pub struct SessionLogger {
    /// Session name used in the log filename.
    session_name: String,
    /// Path to the log file.
    log_path: PathBuf,
    /// Buffered file writer.
    file_writer: Mutex<BufWriter<File>>,
    /// Host callback for UI display.
    host_callback: Mutex<Option<HostLogCallback>>,
    /// Logging configuration.
    config: LogConfig,
}

impl SessionLogger {
    /// Create a logger writing to `<log_dir>/<session_name>.log`.
    pub fn new(
        session_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        host_callback: Option<HostLogCallback>,
    ) -> std::io::Result<Self> {
        let session_name = session_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;
        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&session_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            session_name,
            log_path,
            file_writer: Mutex::new(BufWriter::new(file)),
            host_callback: Mutex::new(host_callback),
            config,
        })
    }

    /// Get the session name.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        let line = format!("[{}] {}", Local::now().format("%H:%M:%S"), message);

        {
            let mut writer = self.file_writer.lock();
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }

        if let Some(callback) = self.host_callback.lock().as_ref() {
            callback(level, &line);
        }
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log a section marker.
    pub fn section(&self, name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(name));
    }
}

/// Replace filesystem-hostile characters in a session name.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
