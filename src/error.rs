//! Error types for hdx-core.

use thiserror::Error;

/// Result type alias using hdx-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during detection and attenuation operations.
///
/// "No explanation found" and "no attenuation succeeds" are deliberately
/// absent: both are terminal, meaningful states carried in the respective
/// result types, not failures.
#[derive(Error, Debug)]
pub enum Error {
    /// The inference/entailment backend cannot be reached or failed to
    /// process a program.
    #[error("engine unavailable: {message}")]
    EngineUnavailable { message: String },

    /// A literal or rule text is not well-formed.
    #[error("malformed hypothesis: {literal}")]
    MalformedHypothesis { literal: String },

    /// Timeout during an external call.
    #[error("operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading datasets
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an engine-unavailable error.
    pub fn engine_unavailable(message: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            message: message.into(),
        }
    }

    /// Create a malformed-hypothesis error.
    pub fn malformed_hypothesis(literal: impl Into<String>) -> Self {
        Self::MalformedHypothesis {
            literal: literal.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }
}
