//! OpenAI-compatible provider implementation.
//!
//! [`OpenAiCompatProvider`] works with any hosted API that follows the
//! OpenAI chat completion format: xAI (the default secondary backend),
//! OpenAI itself (used for briefs), Groq, OpenRouter and many more.

use async_trait::async_trait;
use hookgrade_types::SecretString;
use tracing::{debug, warn};

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// A provider that uses the OpenAI-compatible chat completion API.
///
/// # Construction
///
/// ```rust,ignore
/// use hookgrade_llm::{LlmProviderConfig, OpenAiCompatProvider};
///
/// let config = LlmProviderConfig::new("xai", "https://api.x.ai/v1")
///     .with_api_key_env("XAI_API_KEY");
/// let provider = OpenAiCompatProvider::new(config);
/// ```
pub struct OpenAiCompatProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    api_key: Option<SecretString>,
}

impl OpenAiCompatProvider {
    /// Create a new provider from configuration.
    ///
    /// The API key is resolved from `config.api_key_env` at request time,
    /// so a key exported after startup is picked up.
    pub fn new(config: LlmProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            api_key: None,
        }
    }

    /// Create a new provider with an explicit API key, bypassing the
    /// environment.
    pub fn with_api_key(config: LlmProviderConfig, api_key: impl Into<SecretString>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            api_key: Some(api_key.into()),
        }
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }

    /// Resolve the API key: explicit key > environment variable.
    fn resolve_api_key(&self) -> Result<SecretString> {
        if let Some(ref key) = self.api_key
            && !key.is_empty()
        {
            return Ok(key.clone());
        }
        let var = self.config.api_key_env.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured(format!("{} has no api_key_env", self.config.name))
        })?;
        SecretString::from_env(var)
            .ok_or_else(|| ProviderError::NotConfigured(format!("set {var} env var")))
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn is_configured(&self) -> bool {
        self.resolve_api_key().is_ok()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        // Checked before building the request so a missing key never
        // produces network traffic.
        let api_key = self.resolve_api_key()?;
        let url = self.config.endpoint("chat/completions");

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let mut req = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key.expose()))
            .header("Content-Type", "application/json");

        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            if status.as_u16() == 429 {
                let header_ms = parse_retry_after_header(&response);
                let body = response.text().await.unwrap_or_default();
                let retry_ms = header_ms.unwrap_or(1000);
                let detail = extract_error_message(&body).unwrap_or_default();
                warn!(
                    provider = %self.config.name,
                    retry_after_ms = retry_ms,
                    error = %detail,
                    "rate limited"
                );
                return Err(ProviderError::RateLimited {
                    retry_after_ms: retry_ms,
                });
            }

            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthFailed(message));
            }

            return Err(ProviderError::RequestFailed(format!(
                "HTTP {status}: {message}"
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        debug!(
            provider = %self.config.name,
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            "chat completion response received"
        );

        Ok(chat_response)
    }
}

/// Extract a human-readable error message from a JSON error response body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        // OpenAI format: {"error": {"message": "..."}}
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            // xAI format: {"error": "..."}
            .or_else(|| v.as_str().map(String::from))
    })
}

/// Read the numeric form of the `Retry-After` header as milliseconds.
fn parse_retry_after_header(response: &reqwest::Response) -> Option<u64> {
    let header_val = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())?;
    let secs = header_val.trim().parse::<f64>().ok()?;
    Some((secs * 1000.0).max(0.0) as u64)
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.api_key)
            .finish()
    }
}
