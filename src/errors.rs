//! Error types for the moola game engine
//!
//! The engine is almost entirely pure, so the taxonomy is narrow. A rejected
//! wager is not an error: it comes back as `FlipResult::Invalid`.

use crate::session::SessionStatus;

/// Root error type for all engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The entropy source could not produce a value. Never substituted.
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A wager was attempted on a session that already finished
    #[error("Session is closed (status: {status})")]
    SessionClosed { status: SessionStatus },

    /// A batch simulation worker thread panicked
    #[error("Simulation worker failed: {0}")]
    WorkerFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration loading and validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

impl ConfigurationError {
    pub(crate) fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        ConfigurationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for Results
pub type EngineResult<T> = Result<T, EngineError>;
