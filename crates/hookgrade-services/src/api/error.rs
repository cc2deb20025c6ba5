//! HTTP error responses.
//!
//! Every error body is `{ "error": "<message>" }`. Backend failures never
//! reach this layer.

use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::ServiceError;

/// Body used for unexpected faults.
pub const INTERNAL_ERROR: &str = "Internal Server Error";

/// Body used when a single-shot generation fails.
pub const GENERATION_FAILED: &str = "Generation failed";

/// An error returned by an API handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400: the request failed validation.
    BadRequest(String),
    /// 429: quota exhausted. Carries a `Retry-After` header.
    RateLimited { message: String, retry_after: Duration },
    /// 503: a required credential is missing.
    Unavailable(String),
    /// 500: anything else.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::RateLimited { message: m, .. }
            | Self::Unavailable(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidRequest(m) => Self::BadRequest(m),
            ServiceError::QuotaExceeded {
                message,
                retry_after,
            } => Self::RateLimited {
                message,
                retry_after,
            },
            ServiceError::NotConfigured(m) => Self::Unavailable(m),
            ServiceError::GenerationFailed(_) => Self::Internal(GENERATION_FAILED.into()),
            ServiceError::Json(_) => Self::Internal(INTERNAL_ERROR.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retry_after = match &self {
            Self::RateLimited { retry_after, .. } => Some(retry_after.as_secs().max(1)),
            _ => None,
        };
        let body = Json(serde_json::json!({ "error": self.message() }));
        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
