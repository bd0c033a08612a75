//! Error types for session operations.
//!
//! Errors carry context that chains through layers:
//! Session → Marshal / Transform / Engine → Detail

use thiserror::Error;

use crate::engine::EngineError;
use crate::geometry::TransformError;
use crate::marshal::MarshalError;

/// Top-level error for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No engine is attached; the operation was aborted without side effects.
    #[error("no tractography engine is attached to the session")]
    EngineUnavailable,

    /// The caller handed in an object of the wrong kind.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A volume could not be packaged for the engine.
    #[error("volume marshaling failed: {source}")]
    Marshal {
        #[from]
        source: MarshalError,
    },

    /// A volume's geometry could not be resolved.
    #[error("transform resolution failed: {source}")]
    Transform {
        #[from]
        source: TransformError,
    },

    /// The engine reported a failure.
    #[error("engine operation failed: {source}")]
    Engine {
        #[from]
        source: EngineError,
    },
}

impl SessionError {
    /// Create a precondition violation error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
