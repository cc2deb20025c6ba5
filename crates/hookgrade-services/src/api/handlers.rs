//! HTTP request handlers for the REST API.
//!
//! Bodies are taken as raw bytes and parsed here so a malformed body maps
//! to the service's own error shape instead of axum's rejection text. Only
//! bytes that are not JSON at all are a 500; a JSON body with missing or
//! wrong-typed fields is validated like any other input.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use hookgrade_types::{GradeRequestBody, GradeResult};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::{ApiError, INTERNAL_ERROR};
use super::{ApiState, GRADE_SOURCE_HEADER};
use crate::brief::BriefRequest;
use crate::quota::client_id_from_headers;

/// Build all API routes.
pub fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/grade", post(grade))
        .route("/brief", post(brief))
        .route("/health", get(health_check))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "unreadable request body");
        ApiError::Internal(INTERNAL_ERROR.into())
    })
}

async fn grade(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = GradeRequestBody::from_json_value(parse_body(&body)?);
    let client_id = client_id_from_headers(&headers);
    let outcome = state.grading.grade_for(&client_id, request).await?;

    let mut response = Json::<GradeResult>(outcome.result).into_response();
    if let Ok(value) = HeaderValue::from_str(outcome.source.as_str()) {
        response.headers_mut().insert(GRADE_SOURCE_HEADER, value);
    }
    Ok(response)
}

async fn brief(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Credential first: a misconfigured server answers 503 to any body.
    state.brief.ensure_configured()?;
    let request = BriefRequest::from_json_value(parse_body(&body)?);
    let brief = state.brief.generate(request).await?;
    Ok(Json(serde_json::json!({ "brief": brief })))
}

/// Server start time, set when the first router is built.
static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Record the server start time. Later calls keep the first value.
pub(super) fn mark_started() {
    START_TIME.get_or_init(std::time::Instant::now);
}

/// Returns health status, version, uptime and the backend chain.
async fn health_check(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let start = START_TIME.get_or_init(std::time::Instant::now);
    let uptime_secs = start.elapsed().as_secs();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs,
        "backends": state.grading.chain().names(),
    }))
}
