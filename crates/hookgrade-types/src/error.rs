//! Error types for hookgrade.
//!
//! [`HookgradeError`] is the top-level error for request validation and
//! configuration. Backend failures have their own type in `hookgrade-llm`
//! because they never reach a caller.

use thiserror::Error;

/// Top-level error type for hookgrade.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HookgradeError {
    /// The grade request was rejected before any backend call.
    #[error("{0}")]
    InvalidRequest(String),

    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HookgradeError>;
