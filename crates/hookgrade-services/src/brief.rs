//! Single-shot UGC brief generation.
//!
//! One hosted call, no fallback chain and no quota. Failures surface to the
//! caller as [`ServiceError`] values.

use std::sync::Arc;
use std::time::Duration;

use hookgrade_llm::backends::brief_provider;
use hookgrade_llm::{ChatMessage, ChatRequest, Provider};
use hookgrade_types::config::BriefConfig;
use hookgrade_types::grade::lenient_string;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ServiceError};

const SYSTEM_MESSAGE: &str = "You are a DTC marketing expert. Generate a concise UGC brief.";

/// Served when the model returns an empty completion.
pub const EMPTY_BRIEF: &str = "No brief generated";

/// Request body for `/api/brief`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefRequest {
    #[serde(default, alias = "brand_name", deserialize_with = "lenient_string")]
    pub brand_name: Option<String>,
    #[serde(default, alias = "product_type", deserialize_with = "lenient_string")]
    pub product_type: Option<String>,
}

impl BriefRequest {
    /// Read a request from any JSON value. Non-string fields, and values
    /// that are not objects, count as missing input.
    pub fn from_json_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Generates briefs through one OpenAI-compatible provider.
#[derive(Clone)]
pub struct BriefGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: i32,
    timeout: Duration,
    api_key_env: String,
}

impl BriefGenerator {
    pub fn new(provider: Arc<dyn Provider>, cfg: &BriefConfig) -> Self {
        Self {
            provider,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            timeout: Duration::from_secs(cfg.timeout_secs),
            api_key_env: cfg.api_key_env.clone(),
        }
    }

    pub fn from_config(cfg: &BriefConfig) -> Self {
        Self::new(Arc::new(brief_provider(cfg)), cfg)
    }

    /// Fails when the provider's credential is missing.
    pub fn ensure_configured(&self) -> Result<()> {
        if self.provider.is_configured() {
            Ok(())
        } else {
            Err(ServiceError::NotConfigured(format!(
                "{} is not configured.",
                self.api_key_env
            )))
        }
    }

    /// Generate a brief for one brand and product.
    pub async fn generate(&self, request: BriefRequest) -> Result<String> {
        self.ensure_configured()?;

        let brand = non_blank(request.brand_name);
        let product = non_blank(request.product_type);
        let (Some(brand), Some(product)) = (brand, product) else {
            return Err(ServiceError::InvalidRequest("Missing input".into()));
        };

        let mut chat = ChatRequest::new(
            &self.model,
            vec![
                ChatMessage::system(SYSTEM_MESSAGE),
                ChatMessage::user(user_message(&brand, &product)),
            ],
        );
        chat.max_tokens = Some(self.max_tokens);

        debug!(brand = %brand, product = %product, "generating brief");

        let response = tokio::time::timeout(self.timeout, self.provider.complete(&chat))
            .await
            .map_err(|_| {
                warn!(timeout_secs = self.timeout.as_secs(), "brief generation timed out");
                ServiceError::GenerationFailed(format!("timeout after {:?}", self.timeout))
            })?
            .map_err(|e| {
                warn!(provider = %self.provider.name(), error = %e, "brief generation failed");
                ServiceError::GenerationFailed(e.to_string())
            })?;

        let text = response.first_content().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            Ok(EMPTY_BRIEF.to_string())
        } else {
            Ok(text.to_string())
        }
    }
}

impl std::fmt::Debug for BriefGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BriefGenerator")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn user_message(brand: &str, product: &str) -> String {
    format!(
        "Brand: {brand}. Product: {product}. Include 3 hook ideas, script outline, CTA, \
         target audience, key visuals, tone, length. Bullet points, under 400 words."
    )
}
