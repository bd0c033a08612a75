//! Error types for the engine boundary.

use thiserror::Error;

/// Errors crossing the engine seam.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A run was requested before input data was installed.
    #[error("engine has no input data; call set_data first")]
    DataNotSet,

    /// A run was requested with no output target installed.
    #[error("engine has no output target; call set_output_polydata first")]
    OutputNotSet,

    /// The engine reported a failure during a run.
    #[error("engine run failed: {0}")]
    RunFailed(String),

    /// Bootstrap did not produce an engine within the deadline.
    #[error("engine bootstrap timed out after {secs}s")]
    BootstrapTimedOut { secs: u64 },

    /// The host dropped the bootstrap channel without delivering an engine.
    #[error("engine bootstrap channel closed before an engine was delivered")]
    BootstrapChannelClosed,
}

impl EngineError {
    /// Create a run failed error.
    pub fn run_failed(message: impl Into<String>) -> Self {
        Self::RunFailed(message.into())
    }

    /// Create a bootstrap timeout error.
    pub fn bootstrap_timed_out(secs: u64) -> Self {
        Self::BootstrapTimedOut { secs }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
