//! Turning a chat provider into a hook grader.
//!
//! [`ProviderScorer`] owns everything between "here is a hook" and "here is
//! a structurally valid result": prompt assembly, the per-call deadline,
//! payload extraction, parsing and shape validation. Any step failing
//! yields a [`ProviderError`]; nothing partial escapes.

use std::time::Duration;

use async_trait::async_trait;
use hookgrade_types::{GradeRequest, GradeResult};
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::fences::extract_json_payload;
use crate::prompt::grading_messages;
use crate::provider::Provider;
use crate::types::ChatRequest;

/// Default deadline for one grading call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can grade a hook.
#[async_trait]
pub trait HookScorer: Send + Sync {
    /// Name used in logs and the `x-grade-source` header.
    fn name(&self) -> &str;

    /// Grade one hook. On success the result has already passed
    /// [`GradeResult::validate`].
    async fn score(&self, request: &GradeRequest) -> Result<GradeResult>;
}

/// How a backend is asked for, and delivers, its JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// The backend supports a structured output switch and replies with
    /// bare JSON. Requests carry `"stream": false, "format": "json"`.
    StrictJson,
    /// The backend replies with free text that may wrap the JSON in a
    /// markdown fence. Requests carry a sampling temperature.
    Fenced,
}

/// A [`HookScorer`] backed by a chat [`Provider`].
pub struct ProviderScorer<P> {
    provider: P,
    model: String,
    format: ResponseFormat,
    temperature: Option<f64>,
    timeout: Duration,
}

impl<P: Provider> ProviderScorer<P> {
    pub fn new(provider: P, model: impl Into<String>, format: ResponseFormat) -> Self {
        Self {
            provider,
            model: model.into(),
            format,
            temperature: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder: sampling temperature. Only sent in [`ResponseFormat::Fenced`] mode.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Builder: per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_request(&self, request: &GradeRequest) -> ChatRequest {
        let mut chat = ChatRequest::new(&self.model, grading_messages(request));
        match self.format {
            ResponseFormat::StrictJson => {
                chat.stream = Some(false);
                chat.format = Some("json".into());
            }
            ResponseFormat::Fenced => {
                chat.temperature = self.temperature;
            }
        }
        chat
    }

    /// Extract, parse and validate the reply text.
    fn parse_result(&self, content: &str) -> Result<GradeResult> {
        let payload = match self.format {
            ResponseFormat::StrictJson => content.trim(),
            ResponseFormat::Fenced => extract_json_payload(content),
        };
        let result: GradeResult = serde_json::from_str(payload).map_err(|e| {
            ProviderError::InvalidResponse(format!("reply is not a grade result: {e}"))
        })?;
        result.validate()?;
        Ok(result)
    }
}

#[async_trait]
impl<P: Provider> HookScorer for ProviderScorer<P> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn score(&self, request: &GradeRequest) -> Result<GradeResult> {
        if !self.provider.is_configured() {
            return Err(ProviderError::NotConfigured(format!(
                "{} is missing credentials",
                self.provider.name()
            )));
        }

        let chat = self.build_request(request);
        let response = tokio::time::timeout(self.timeout, self.provider.complete(&chat))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        let content = response
            .first_content()
            .ok_or_else(|| ProviderError::InvalidResponse("reply has no choices".into()))?;

        let result = self.parse_result(content)?;
        debug!(
            scorer = %self.provider.name(),
            overall_score = result.overall_score,
            "hook scored"
        );
        Ok(result)
    }
}

impl<P> std::fmt::Debug for ProviderScorer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderScorer")
            .field("model", &self.model)
            .field("format", &self.format)
            .field("timeout", &self.timeout)
            .finish()
    }
}
