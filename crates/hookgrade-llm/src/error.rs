//! Provider error types for hookgrade-llm.
//!
//! Every adapter failure is expressed as a [`ProviderError`]. None of these
//! reach an HTTP caller: the orchestrator logs them and moves on to the
//! next backend.

use std::time::Duration;

use hookgrade_types::ShapeError;
use thiserror::Error;

/// Errors that can occur when asking a backend to grade a hook.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The HTTP request to the provider failed or returned a non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Authentication with the provider was rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The provider returned a rate-limit response (HTTP 429).
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait time before retrying, in milliseconds.
        retry_after_ms: u64,
    },

    /// The provider has not been configured (e.g. missing API key).
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The provider replied, but not with anything we could read.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The reply parsed but failed the result contract.
    #[error("invalid shape: {0}")]
    InvalidShape(#[from] ShapeError),

    /// The call did not finish within its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Every scorer in a chain failed.
    #[error("all scorers exhausted: {}", attempts.join("; "))]
    AllProvidersExhausted {
        /// One `"<name>: <error>"` entry per scorer, in call order.
        attempts: Vec<String>,
    },
}

impl ProviderError {
    /// Short code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => "request_failed",
            Self::AuthFailed(_) => "auth_failed",
            Self::RateLimited { .. } => "rate_limited",
            Self::NotConfigured(_) => "not_configured",
            Self::InvalidResponse(_) => "invalid_response",
            Self::InvalidShape(_) => "invalid_shape",
            Self::Timeout(_) => "timeout",
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "http_error",
            Self::Json(_) => "json_error",
            Self::AllProvidersExhausted { .. } => "exhausted",
        }
    }
}

/// A convenience type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
