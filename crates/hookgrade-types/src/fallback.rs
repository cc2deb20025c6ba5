//! The pre-authored result served when every backend fails.
//!
//! Callers receive it with a success status, so a total outage is silent
//! at the status-code level. The orchestrator tags it as
//! `GradeSource::Fallback` so the HTTP layer can expose that separately.

use std::sync::LazyLock;

use crate::grade::{Alternative, Dimension, GradeResult};

static FALLBACK: LazyLock<GradeResult> = LazyLock::new(|| GradeResult {
    overall_score: 72,
    dimensions: vec![
        dimension("Curiosity Gap", 15, "Good use of 'today years old' creates a gap."),
        dimension("Specificity", 12, "Could be more specific about the flavor."),
        dimension("Emotional Trigger", 14, "Hits on surprise and slight humor."),
        dimension("Pattern Interrupt", 16, "Visual of pouring helps stop the scroll."),
        dimension("Platform Fit", 15, "Matches TikTok style well."),
    ],
    alternatives: vec![
        alternative("The Contrarian", "Stop drinking plain water.", "Goes against common advice."),
        alternative("The Specific Result", "I drank this for 7 days.", "Implies a result."),
        alternative("The Question", "Why is water so boring?", "A relatable question."),
        alternative("The Visual Setup", "Watch this change color.", "Promise of visual payoff."),
        alternative("The Hot Take", "Water is overrated.", "Controversial statement."),
    ],
});

/// Returns a copy of the fallback result.
pub fn fallback_result() -> GradeResult {
    FALLBACK.clone()
}

fn dimension(name: &str, score: i64, explanation: &str) -> Dimension {
    Dimension {
        name: name.into(),
        score,
        explanation: explanation.into(),
    }
}

fn alternative(label: &str, hook: &str, explanation: &str) -> Alternative {
    Alternative {
        label: label.into(),
        hook: hook.into(),
        explanation: explanation.into(),
    }
}
