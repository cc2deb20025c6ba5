//! Same-host inference server with an Ollama-style chat endpoint.
//!
//! The server replies to `POST {base_url}/api/chat` with a single message
//! object instead of a `choices` array. [`OllamaProvider`] normalizes that
//! reply into a one-choice [`ChatResponse`] so scorers never see the
//! difference.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, Choice, Usage};

/// Reply body of a non-streaming `/api/chat` call.
#[derive(Debug, Deserialize)]
struct OllamaChatReply {
    #[serde(default)]
    model: String,
    message: ChatMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<i32>,
    #[serde(default)]
    eval_count: Option<i32>,
}

impl From<OllamaChatReply> for ChatResponse {
    fn from(reply: OllamaChatReply) -> Self {
        let usage = match (reply.prompt_eval_count, reply.eval_count) {
            (None, None) => None,
            (prompt, completion) => {
                let prompt = prompt.unwrap_or(0);
                let completion = completion.unwrap_or(0);
                Some(Usage {
                    prompt_tokens: prompt,
                    completion_tokens: completion,
                    total_tokens: prompt + completion,
                })
            }
        };
        let finish_reason = reply
            .done_reason
            .or_else(|| reply.done.then(|| "stop".to_string()));
        ChatResponse {
            id: String::new(),
            choices: vec![Choice {
                index: 0,
                message: reply.message,
                finish_reason,
            }],
            usage,
            model: reply.model,
        }
    }
}

/// A provider for a local Ollama-compatible server. Needs no credential.
pub struct OllamaProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: LlmProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.config.endpoint("api/chat");

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            "sending local chat request"
        );

        let mut req = self
            .http
            .post(&url)
            .header("Content-Type", "application/json");
        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);
            return Err(ProviderError::RequestFailed(format!(
                "HTTP {status}: {message}"
            )));
        }

        let reply: OllamaChatReply = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        debug!(
            provider = %self.config.name,
            model = %reply.model,
            done = reply.done,
            "local chat response received"
        );

        Ok(reply.into())
    }
}

/// Ollama reports errors as `{"error": "..."}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(String::from)
}

impl std::fmt::Debug for OllamaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_normalizes_to_single_choice() {
        let json = r#"{
            "model": "llama3.1",
            "created_at": "2024-07-22T20:17:51.397Z",
            "message": {"role": "assistant", "content": "{\"overallScore\": 70}"},
            "done": true,
            "prompt_eval_count": 412,
            "eval_count": 300
        }"#;
        let reply: OllamaChatReply = serde_json::from_str(json).unwrap();
        let resp: ChatResponse = reply.into();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.first_content(), Some("{\"overallScore\": 70}"));
        assert_eq!(resp.model, "llama3.1");
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.unwrap().total_tokens, 712);
    }

    #[test]
    fn reply_without_counts_has_no_usage() {
        let json = r#"{"message": {"role": "assistant", "content": "hi"}}"#;
        let reply: OllamaChatReply = serde_json::from_str(json).unwrap();
        let resp: ChatResponse = reply.into();
        assert!(resp.usage.is_none());
        assert!(resp.choices[0].finish_reason.is_none());
    }

    #[test]
    fn reply_without_message_fails() {
        let json = r#"{"model": "llama3.1", "done": true}"#;
        assert!(serde_json::from_str::<OllamaChatReply>(json).is_err());
    }

    #[test]
    fn error_body_extracted() {
        assert_eq!(
            extract_error_message(r#"{"error": "model 'llama3.1' not found"}"#).as_deref(),
            Some("model 'llama3.1' not found")
        );
        assert!(extract_error_message("gateway down").is_none());
    }

    #[test]
    fn always_configured() {
        let provider =
            OllamaProvider::new(LlmProviderConfig::new("ollama", "http://localhost:11434"));
        assert!(provider.is_configured());
        assert_eq!(provider.name(), "ollama");
    }
}
