//! Build providers and scorers from configuration.

use std::sync::Arc;
use std::time::Duration;

use hookgrade_types::config::{
    BackendsConfig, BriefConfig, PrimaryBackendConfig, SecondaryBackendConfig,
};
use tracing::info;

use crate::config::LlmProviderConfig;
use crate::failover::ScorerChain;
use crate::ollama::OllamaProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::scorer::{HookScorer, ProviderScorer, ResponseFormat};

/// Name reported by the local backend.
pub const PRIMARY_NAME: &str = "ollama";

/// Name reported by the brief provider.
pub const BRIEF_NAME: &str = "brief";

/// The local backend: strict JSON mode, no credential.
pub fn primary_scorer(cfg: &PrimaryBackendConfig) -> ProviderScorer<OllamaProvider> {
    let provider = OllamaProvider::new(LlmProviderConfig::new(PRIMARY_NAME, &cfg.base_url));
    ProviderScorer::new(provider, &cfg.model, ResponseFormat::StrictJson)
        .with_timeout(Duration::from_secs(cfg.timeout_secs))
}

/// The hosted backend: bearer auth from `api_key_env`, fenced replies.
pub fn secondary_scorer(cfg: &SecondaryBackendConfig) -> ProviderScorer<OpenAiCompatProvider> {
    let provider = OpenAiCompatProvider::new(
        LlmProviderConfig::new(&cfg.name, &cfg.base_url).with_api_key_env(&cfg.api_key_env),
    );
    ProviderScorer::new(provider, &cfg.model, ResponseFormat::Fenced)
        .with_temperature(cfg.temperature)
        .with_timeout(Duration::from_secs(cfg.timeout_secs))
}

/// The configured chain: primary then secondary, skipping disabled ones.
pub fn chain_from_config(cfg: &BackendsConfig) -> ScorerChain {
    let mut scorers: Vec<Arc<dyn HookScorer>> = Vec::with_capacity(2);
    if cfg.primary.enabled {
        scorers.push(Arc::new(primary_scorer(&cfg.primary)));
    }
    if cfg.secondary.enabled {
        scorers.push(Arc::new(secondary_scorer(&cfg.secondary)));
    }
    let chain = ScorerChain::new(scorers);
    info!(scorers = ?chain.names(), "grading chain configured");
    chain
}

/// The OpenAI-compatible provider used for brief generation.
pub fn brief_provider(cfg: &BriefConfig) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new(
        LlmProviderConfig::new(BRIEF_NAME, &cfg.base_url).with_api_key_env(&cfg.api_key_env),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[test]
    fn default_chain_is_primary_then_secondary() {
        let chain = chain_from_config(&BackendsConfig::default());
        assert_eq!(chain.names(), vec!["ollama", "xai"]);
    }

    #[test]
    fn disabled_backends_skipped() {
        let mut cfg = BackendsConfig::default();
        cfg.primary.enabled = false;
        assert_eq!(chain_from_config(&cfg).names(), vec!["xai"]);

        cfg.secondary.enabled = false;
        assert!(chain_from_config(&cfg).is_empty());
    }

    #[test]
    fn scorer_timeouts_follow_config() {
        let mut cfg = BackendsConfig::default();
        cfg.primary.timeout_secs = 3;
        cfg.secondary.timeout_secs = 7;
        assert_eq!(primary_scorer(&cfg.primary).timeout(), Duration::from_secs(3));
        assert_eq!(secondary_scorer(&cfg.secondary).timeout(), Duration::from_secs(7));
    }

    #[test]
    fn secondary_uses_configured_name_and_key_env() {
        let mut cfg = SecondaryBackendConfig::default();
        cfg.name = "groq".into();
        cfg.api_key_env = "HOOKGRADE_TEST_GROQ_KEY".into();
        let scorer = secondary_scorer(&cfg);
        assert_eq!(scorer.name(), "groq");
        assert_eq!(
            scorer.provider().config().api_key_env.as_deref(),
            Some("HOOKGRADE_TEST_GROQ_KEY")
        );
    }

    #[test]
    fn brief_provider_reads_key_env() {
        let cfg = BriefConfig {
            api_key_env: "HOOKGRADE_TEST_BRIEF_KEY".into(),
            ..BriefConfig::default()
        };
        temp_env::with_var_unset("HOOKGRADE_TEST_BRIEF_KEY", || {
            assert!(!brief_provider(&cfg).is_configured());
        });
        temp_env::with_var("HOOKGRADE_TEST_BRIEF_KEY", Some("sk-test"), || {
            assert!(brief_provider(&cfg).is_configured());
        });
    }
}
