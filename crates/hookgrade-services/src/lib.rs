//! Services for hookgrade.
//!
//! Provides the per-client [`quota`] gate, the [`grading`] orchestrator
//! that walks the backend chain and serves the fallback result, single-shot
//! [`brief`] generation, and the axum [`api`] that exposes them over HTTP.
//!
//! Once a grading request passes validation and the quota gate, it always
//! produces a structurally valid result. The `x-grade-source` response
//! header says which backend produced it, or `fallback`.

pub mod api;
pub mod brief;
pub mod error;
pub mod grading;
pub mod quota;

pub use error::{Result, ServiceError};
pub use grading::{GradeOutcome, GradeSource, GradingOrchestrator};
pub use quota::{Admission, InMemoryQuotaStore, QuotaGate, QuotaPolicy, QuotaStore};
