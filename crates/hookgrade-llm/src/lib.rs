//! Grading backends for hookgrade.
//!
//! Each backend wraps one chat endpoint behind the uniform
//! [`HookScorer::score`] call, which yields either a structurally valid
//! [`GradeResult`](hookgrade_types::GradeResult) or a [`ProviderError`]
//! describing why it could not.
//!
//! # Architecture
//!
//! - [`Provider`] trait sends a raw chat request and returns the completion
//! - [`OllamaProvider`] talks to a same-host `/api/chat` endpoint
//! - [`OpenAiCompatProvider`] talks to any hosted `/chat/completions` endpoint
//! - [`ProviderScorer`] turns a provider into a [`HookScorer`]: it builds the
//!   grading prompt, bounds the call with a timeout, extracts and validates
//!   the JSON payload
//! - [`ScorerChain`] tries scorers in order and stops at the first success
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hookgrade_llm::backends::chain_from_config;
//! use hookgrade_types::{GradeRequest, Platform, config::BackendsConfig};
//!
//! let chain = chain_from_config(&BackendsConfig::default());
//! let request = GradeRequest::new("I was today years old...", Platform::TikTok, "Beverage")?;
//! let scored = chain.first_success(&request).await?;
//! println!("{} scored {}", scored.scorer, scored.result.overall_score);
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod failover;
pub mod fences;
pub mod ollama;
pub mod openai_compat;
pub mod prompt;
pub mod provider;
pub mod scorer;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{ProviderError, Result};
pub use failover::{Scored, ScorerChain};
pub use ollama::OllamaProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::Provider;
pub use scorer::{HookScorer, ProviderScorer, ResponseFormat};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Usage};
