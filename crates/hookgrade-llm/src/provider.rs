//! The core [`Provider`] trait for chat completions.
//!
//! Providers only move messages over the wire. Turning a completion into a
//! grade is the job of [`ProviderScorer`](crate::scorer::ProviderScorer).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// A provider that can execute chat completion requests.
///
/// Implementations handle the protocol details for a specific API
/// (authentication, request formatting, response parsing) and normalize
/// the reply into a [`ChatResponse`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g. "ollama", "xai").
    fn name(&self) -> &str;

    /// Whether the provider has what it needs to make a call. A provider
    /// that returns `false` fails fast with
    /// [`ProviderError::NotConfigured`](crate::error::ProviderError::NotConfigured)
    /// without touching the network.
    fn is_configured(&self) -> bool {
        true
    }

    /// Execute a chat completion request and return the response.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`](crate::error::ProviderError) if the request
    /// fails due to network issues, authentication problems, rate limiting,
    /// or an unparseable response.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
