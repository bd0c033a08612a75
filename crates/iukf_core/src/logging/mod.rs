//! Logging infrastructure.
//!
//! Two layers:
//! - Process-wide diagnostics through the `tracing` ecosystem
//!   ([`init_tracing`]), driven by `RUST_LOG`.
//! - Per-session logs with file + host callback dual output
//!   ([`SessionLogger`]), surfaced in the host UI while a run executes.

mod session_logger;
mod types;

pub use session_logger::SessionLogger;
pub use types::{HostLogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`, falling back to the provided default level.
/// Should be called once at host startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Convert a LogLevel to an env-filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}
