//! REST API for the hookgrade service.
//!
//! Provides the grading endpoint, the brief endpoint and a health check.
//! All routes live under `/api`.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use hookgrade_types::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::brief::BriefGenerator;
use crate::grading::GradingOrchestrator;

pub use error::ApiError;

/// Response header naming the source of a served grade.
pub const GRADE_SOURCE_HEADER: &str = "x-grade-source";

/// Shared state accessible by all API handlers.
#[derive(Clone, Debug)]
pub struct ApiState {
    /// Quota gate, backend chain and fallback.
    pub grading: Arc<GradingOrchestrator>,
    /// Single-shot brief generation.
    pub brief: Arc<BriefGenerator>,
}

impl ApiState {
    pub fn new(grading: GradingOrchestrator, brief: BriefGenerator) -> Self {
        Self {
            grading: Arc::new(grading),
            brief: Arc::new(brief),
        }
    }

    /// Build every service described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            GradingOrchestrator::from_config(config),
            BriefGenerator::from_config(&config.brief),
        )
    }
}

/// Build the API router with all routes.
pub fn build_router(state: ApiState, cors_origins: &[String]) -> Router {
    handlers::mark_started();

    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([HeaderName::from_static(GRADE_SOURCE_HEADER)])
    };

    Router::new()
        .nest("/api", handlers::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
