//! Service error types.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by services in this crate.
///
/// Backend failures are absent on purpose: the orchestrator absorbs them
/// and serves the fallback result instead.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request failed validation before any backend was called.
    #[error("{0}")]
    InvalidRequest(String),

    /// The caller has used up its quota for the current window.
    #[error("{message}")]
    QuotaExceeded {
        message: String,
        /// Time until the caller's window resets.
        retry_after: Duration,
    },

    /// A required credential is missing.
    #[error("{0}")]
    NotConfigured(String),

    /// A single-shot generation call failed.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ServiceError::InvalidRequest("Hook is required".into());
        assert_eq!(err.to_string(), "Hook is required");

        let err = ServiceError::QuotaExceeded {
            message: "Rate limit exceeded (100/day). Try again tomorrow.".into(),
            retry_after: Duration::from_secs(60),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded (100/day). Try again tomorrow."
        );

        let err = ServiceError::NotConfigured("VERCEL_AI_API_KEY is not configured.".into());
        assert_eq!(err.to_string(), "VERCEL_AI_API_KEY is not configured.");

        let err = ServiceError::GenerationFailed("timeout after 20s".into());
        assert_eq!(err.to_string(), "generation failed: timeout after 20s");
    }

    #[test]
    fn error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: ServiceError = json_err.into();
        assert!(matches!(err, ServiceError::Json(_)));
    }
}
