//! Connection settings for a single chat endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How to reach one provider endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmProviderConfig {
    /// Human-readable provider name, used in logs and the `x-grade-source`
    /// header (e.g. "ollama", "xai").
    pub name: String,

    /// Base URL. For OpenAI-compatible hosts this includes the version
    /// segment (e.g. "https://api.x.ai/v1").
    pub base_url: String,

    /// Environment variable that holds the bearer token. `None` for
    /// endpoints that need no credential.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Extra HTTP headers to include in every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl LlmProviderConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key_env: None,
            headers: HashMap::new(),
        }
    }

    /// Builder: name the env var holding the API key.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Builder: add an extra header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// `base_url` joined with `path`, without doubling slashes.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
