//! The grading orchestrator.
//!
//! [`GradingOrchestrator`] composes the [`QuotaGate`], the ordered
//! [`ScorerChain`] and the static fallback result. Once a request is past
//! validation and the gate, grading cannot fail: if every backend fails the
//! caller receives [`fallback_result`] and the outcome is tagged
//! [`GradeSource::Fallback`].

use hookgrade_llm::ScorerChain;
use hookgrade_llm::backends::chain_from_config;
use hookgrade_types::config::Config;
use hookgrade_types::{GradeRequest, GradeRequestBody, GradeResult, fallback_result};
use tracing::{info, warn};

use crate::error::{Result, ServiceError};
use crate::quota::{Admission, QuotaGate};

/// Header value used when the fallback result was served.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Where a served result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeSource {
    /// A backend scored the hook. Holds the backend name.
    Backend(String),
    /// Every backend failed; the static fallback was served.
    Fallback,
}

impl GradeSource {
    /// Value for the `x-grade-source` response header.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Backend(name) => name,
            Self::Fallback => FALLBACK_SOURCE,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl std::fmt::Display for GradeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A served result and its source.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub result: GradeResult,
    pub source: GradeSource,
}

/// Quota gate + backend chain + fallback.
#[derive(Debug, Clone)]
pub struct GradingOrchestrator {
    gate: QuotaGate,
    chain: ScorerChain,
}

impl GradingOrchestrator {
    pub fn new(gate: QuotaGate, chain: ScorerChain) -> Self {
        Self { gate, chain }
    }

    /// Build the gate and chain described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            QuotaGate::in_memory(&config.quota),
            chain_from_config(&config.backends),
        )
    }

    pub fn gate(&self) -> &QuotaGate {
        &self.gate
    }

    pub fn chain(&self) -> &ScorerChain {
        &self.chain
    }

    /// Grade a validated request without touching the quota.
    ///
    /// Never fails: a total backend outage yields the fallback result.
    pub async fn grade(&self, request: &GradeRequest) -> GradeOutcome {
        match self.chain.first_success(request).await {
            Ok(scored) => {
                info!(
                    source = %scored.scorer,
                    overall_score = scored.result.overall_score,
                    "hook graded"
                );
                GradeOutcome {
                    result: scored.result,
                    source: GradeSource::Backend(scored.scorer),
                }
            }
            Err(err) => {
                warn!(error = %err, "all backends failed, serving fallback result");
                GradeOutcome {
                    result: fallback_result(),
                    source: GradeSource::Fallback,
                }
            }
        }
    }

    /// Validate, admit and grade one caller request.
    ///
    /// Validation runs before the gate, so a rejected body never consumes
    /// quota. The gate runs before any backend call.
    pub async fn grade_for(&self, client_id: &str, body: GradeRequestBody) -> Result<GradeOutcome> {
        let request = body
            .into_request()
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

        if let Admission::Denied { retry_after } = self.gate.admit(client_id).await {
            return Err(ServiceError::QuotaExceeded {
                message: self.gate.policy().exceeded_message(),
                retry_after,
            });
        }

        Ok(self.grade(&request).await)
    }
}
