//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`. Unknown fields are ignored and every field has a
//! default, so an empty object is a valid config.
//!
//! Credentials never live in the config file. Remote backends name the
//! environment variable that holds their key (`api_key_env`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HookgradeError, Result};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "HOOKGRADE_CONFIG";

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-client request quota.
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Grading backends, tried in order.
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Brief generation endpoint.
    #[serde(default)]
    pub brief: BriefConfig,
}

impl Config {
    /// Parse a config from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Reject values that would make the service misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.quota.limit == 0 {
            return Err(invalid("quota.limit must be at least 1"));
        }
        if self.quota.window_secs == 0 {
            return Err(invalid("quota.window_secs must be at least 1"));
        }
        if self.backends.primary.timeout_secs == 0 || self.backends.secondary.timeout_secs == 0 {
            return Err(invalid("backend timeout_secs must be at least 1"));
        }
        if self.brief.timeout_secs == 0 {
            return Err(invalid("brief.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> HookgradeError {
    HookgradeError::ConfigInvalid {
        reason: reason.into(),
    }
}

/// Find the config file to load.
///
/// Discovery order:
/// 1. `HOOKGRADE_CONFIG` env var
/// 2. `~/.hookgrade/config.json`
///
/// Returns `None` when neither exists; callers fall back to defaults.
pub fn discover_config_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV)
        && !explicit.trim().is_empty()
    {
        return Some(PathBuf::from(explicit));
    }
    let candidate = dirs::home_dir()?.join(".hookgrade").join("config.json");
    candidate.exists().then_some(candidate)
}

// ── Server ───────────────────────────────────────────────────────────────

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty means permissive.
    #[serde(default, alias = "corsOrigins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

// ── Quota ────────────────────────────────────────────────────────────────

/// Per-client request quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaConfig {
    /// Admitted requests per client per window.
    #[serde(default = "default_quota_limit")]
    pub limit: u32,

    /// Window length in seconds.
    #[serde(default = "default_quota_window", alias = "windowSecs")]
    pub window_secs: u64,

    /// Cap on tracked clients. `None` keeps every client for the life of
    /// the process.
    #[serde(default, alias = "maxClients")]
    pub max_clients: Option<usize>,
}

fn default_quota_limit() -> u32 {
    100
}

fn default_quota_window() -> u64 {
    86_400
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limit: default_quota_limit(),
            window_secs: default_quota_window(),
            max_clients: None,
        }
    }
}

// ── Backends ─────────────────────────────────────────────────────────────

/// The ordered grading backends.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BackendsConfig {
    #[serde(default)]
    pub primary: PrimaryBackendConfig,

    #[serde(default)]
    pub secondary: SecondaryBackendConfig,
}

/// Same-host inference server with an Ollama-style `/api/chat` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrimaryBackendConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_primary_url", alias = "baseUrl")]
    pub base_url: String,

    #[serde(default = "default_primary_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

fn default_primary_url() -> String {
    "http://localhost:11434".into()
}

fn default_primary_model() -> String {
    "llama3.1".into()
}

impl Default for PrimaryBackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_primary_url(),
            model: default_primary_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Hosted provider with an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecondaryBackendConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_secondary_name")]
    pub name: String,

    #[serde(default = "default_secondary_url", alias = "baseUrl")]
    pub base_url: String,

    #[serde(default = "default_secondary_model")]
    pub model: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_secondary_key_env", alias = "apiKeyEnv")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

fn default_secondary_name() -> String {
    "xai".into()
}

fn default_secondary_url() -> String {
    "https://api.x.ai/v1".into()
}

fn default_secondary_model() -> String {
    "grok-beta".into()
}

fn default_secondary_key_env() -> String {
    "XAI_API_KEY".into()
}

fn default_temperature() -> f64 {
    0.7
}

impl Default for SecondaryBackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_secondary_name(),
            base_url: default_secondary_url(),
            model: default_secondary_model(),
            api_key_env: default_secondary_key_env(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Brief ────────────────────────────────────────────────────────────────

/// Single-call brief generation. No fallback chain and no quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BriefConfig {
    #[serde(default = "default_brief_url", alias = "baseUrl")]
    pub base_url: String,

    #[serde(default = "default_brief_model")]
    pub model: String,

    #[serde(default = "default_brief_key_env", alias = "apiKeyEnv")]
    pub api_key_env: String,

    #[serde(default = "default_brief_max_tokens", alias = "maxTokens")]
    pub max_tokens: i32,

    #[serde(default = "default_brief_timeout", alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

fn default_brief_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_brief_model() -> String {
    "gpt-4o-mini".into()
}

fn default_brief_key_env() -> String {
    "VERCEL_AI_API_KEY".into()
}

fn default_brief_max_tokens() -> i32 {
    600
}

fn default_brief_timeout() -> u64 {
    20
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            base_url: default_brief_url(),
            model: default_brief_model(),
            api_key_env: default_brief_key_env(),
            max_tokens: default_brief_max_tokens(),
            timeout_secs: default_brief_timeout(),
        }
    }
}

// ── Shared defaults ──────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

/// Per-backend deadline. Grading sits on the request path, so a stalled
/// backend must give way to the next one quickly.
fn default_timeout_secs() -> u64 {
    10
}
