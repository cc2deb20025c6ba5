//! Scorer failover: try the next scorer whenever one fails.
//!
//! [`ScorerChain`] calls scorers strictly in order and stops at the first
//! success, so a later scorer is never contacted once an earlier one has
//! produced a valid result. Every error class is failover-eligible: a bad
//! key on one backend says nothing about the next.

use std::sync::Arc;

use hookgrade_types::{GradeRequest, GradeResult};
use tracing::warn;

use crate::error::{ProviderError, Result};
use crate::scorer::HookScorer;

/// The first successful result from a [`ScorerChain`].
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub result: GradeResult,
    /// Name of the scorer that produced `result`.
    pub scorer: String,
    /// Zero-based position of that scorer in the chain.
    pub position: usize,
}

/// An ordered list of scorers.
///
/// # Example
///
/// ```rust,ignore
/// use hookgrade_llm::failover::ScorerChain;
///
/// let chain = ScorerChain::new(vec![Arc::new(primary), Arc::new(secondary)]);
/// match chain.first_success(&request).await {
///     Ok(scored) => println!("graded by {}", scored.scorer),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Clone, Default)]
pub struct ScorerChain {
    scorers: Vec<Arc<dyn HookScorer>>,
}

impl ScorerChain {
    /// Create a chain. The first scorer is the primary; the rest are
    /// fallbacks in order. An empty chain is allowed and always fails.
    pub fn new(scorers: Vec<Arc<dyn HookScorer>>) -> Self {
        Self { scorers }
    }

    /// Builder: append a scorer to the end of the chain.
    pub fn with_scorer(mut self, scorer: Arc<dyn HookScorer>) -> Self {
        self.scorers.push(scorer);
        self
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Names of all scorers in the chain, in order.
    pub fn names(&self) -> Vec<&str> {
        self.scorers.iter().map(|s| s.name()).collect()
    }

    /// Call each scorer in turn and return the first valid result.
    ///
    /// # Errors
    ///
    /// [`ProviderError::AllProvidersExhausted`] when every scorer failed
    /// (or the chain is empty), listing each failure in call order.
    pub async fn first_success(&self, request: &GradeRequest) -> Result<Scored> {
        let mut attempts: Vec<String> = Vec::with_capacity(self.scorers.len());

        for (idx, scorer) in self.scorers.iter().enumerate() {
            match scorer.score(request).await {
                Ok(result) => {
                    return Ok(Scored {
                        result,
                        scorer: scorer.name().to_owned(),
                        position: idx,
                    });
                }
                Err(err) => {
                    warn!(
                        scorer = %scorer.name(),
                        scorer_index = idx,
                        total_scorers = self.scorers.len(),
                        code = err.code(),
                        error = %err,
                        "scorer failed, trying next in chain"
                    );
                    attempts.push(format!("{}: {err}", scorer.name()));
                }
            }
        }

        Err(ProviderError::AllProvidersExhausted { attempts })
    }
}

impl std::fmt::Debug for ScorerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScorerChain")
            .field("scorers", &self.names())
            .finish()
    }
}
