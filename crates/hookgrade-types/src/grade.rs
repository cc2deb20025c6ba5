//! Grade requests and the result contract shared by every backend.
//!
//! A [`GradeResult`] is produced by an external model and is only trusted
//! after [`GradeResult::validate`] passes. The arithmetic relationship
//! between `overall_score` and the dimension scores is *not* enforced.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::{HookgradeError, Result};

/// The five scoring axes, in the order backends are asked to report them.
pub const DIMENSION_NAMES: [&str; 5] = [
    "Curiosity Gap",
    "Specificity",
    "Emotional Trigger",
    "Pattern Interrupt",
    "Platform Fit",
];

/// Number of dimensions every result must carry.
pub const DIMENSION_COUNT: usize = 5;

/// Number of alternative hooks every result must carry.
pub const ALTERNATIVE_COUNT: usize = 5;

/// Upper bound for `overall_score`.
pub const MAX_OVERALL_SCORE: i64 = 100;

/// Upper bound for a single dimension score.
pub const MAX_DIMENSION_SCORE: i64 = 20;

/// Category used when the caller does not send one.
pub const DEFAULT_CATEGORY: &str = "General";

const HOOK_REQUIRED: &str = "Hook is required";

// ── Platform ─────────────────────────────────────────────────────────────

/// Where the ad will run.
///
/// Serialized as its display label. Labels outside the fixed set are kept
/// verbatim as [`Platform::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    #[default]
    TikTok,
    InstagramReel,
    MetaAd,
    YouTubeShort,
    Other(String),
}

impl Platform {
    /// The label sent to backends and echoed in JSON.
    pub fn label(&self) -> &str {
        match self {
            Self::TikTok => "TikTok",
            Self::InstagramReel => "Instagram Reel",
            Self::MetaAd => "Meta Ad",
            Self::YouTubeShort => "YouTube Short",
            Self::Other(label) => label,
        }
    }

    /// Parse a label. Matching is case-insensitive; anything unknown becomes
    /// [`Platform::Other`] and blank input becomes the default.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Self::default(),
            "tiktok" => Self::TikTok,
            "instagram reel" | "instagram reels" | "instagram" => Self::InstagramReel,
            "meta ad" | "meta" | "facebook" => Self::MetaAd,
            "youtube short" | "youtube shorts" | "youtube" => Self::YouTubeShort,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.label().to_string()
    }
}

// ── Requests ─────────────────────────────────────────────────────────────

/// Raw request body as it arrives from an HTTP caller.
///
/// Every field is optional on the wire and a non-string value counts as
/// absent; [`GradeRequestBody::into_request`] applies defaults and rejects a
/// blank hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeRequestBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hook: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

/// Deserialize a string field, treating any other JSON value as `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl GradeRequestBody {
    /// Read a body from any JSON value. A value that is not an object
    /// yields an empty body.
    pub fn from_json_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Validate the body and build a [`GradeRequest`].
    pub fn into_request(self) -> Result<GradeRequest> {
        let platform = self
            .platform
            .as_deref()
            .map(Platform::from_label)
            .unwrap_or_default();
        GradeRequest::new(
            self.hook.unwrap_or_default(),
            platform,
            self.category.unwrap_or_default(),
        )
    }
}

/// A validated request to grade one hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeRequest {
    pub hook: String,
    pub platform: Platform,
    pub category: String,
}

impl GradeRequest {
    /// Build a request. Fails when `hook` is empty after trimming.
    ///
    /// A blank category falls back to [`DEFAULT_CATEGORY`].
    pub fn new(
        hook: impl Into<String>,
        platform: Platform,
        category: impl Into<String>,
    ) -> Result<Self> {
        let hook = hook.into();
        if hook.trim().is_empty() {
            return Err(HookgradeError::InvalidRequest(HOOK_REQUIRED.into()));
        }
        let category = category.into();
        let category = if category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.trim().to_string()
        };
        Ok(Self {
            hook,
            platform,
            category,
        })
    }
}

// ── Result contract ──────────────────────────────────────────────────────

/// One scored axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub score: i64,
    pub explanation: String,
}

/// A rewritten hook tagged with the angle it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub label: String,
    pub hook: String,
    pub explanation: String,
}

/// The scored result returned to callers.
///
/// Scores are integers on the wire; a fractional score fails
/// deserialization and is treated like any other malformed result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    #[serde(alias = "overall_score")]
    pub overall_score: i64,
    pub dimensions: Vec<Dimension>,
    pub alternatives: Vec<Alternative>,
}

/// Why a backend result failed structural validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected 5 dimensions, got {0}")]
    DimensionCount(usize),

    #[error("expected 5 alternatives, got {0}")]
    AlternativeCount(usize),

    #[error("overall score {0} outside 0..=100")]
    OverallOutOfRange(i64),

    #[error("dimension '{name}' score {score} outside 0..=20")]
    DimensionOutOfRange { name: String, score: i64 },
}

impl GradeResult {
    /// Check counts and score ranges.
    pub fn validate(&self) -> std::result::Result<(), ShapeError> {
        if self.dimensions.len() != DIMENSION_COUNT {
            return Err(ShapeError::DimensionCount(self.dimensions.len()));
        }
        if self.alternatives.len() != ALTERNATIVE_COUNT {
            return Err(ShapeError::AlternativeCount(self.alternatives.len()));
        }
        if !(0..=MAX_OVERALL_SCORE).contains(&self.overall_score) {
            return Err(ShapeError::OverallOutOfRange(self.overall_score));
        }
        if let Some(d) = self
            .dimensions
            .iter()
            .find(|d| !(0..=MAX_DIMENSION_SCORE).contains(&d.score))
        {
            return Err(ShapeError::DimensionOutOfRange {
                name: d.name.clone(),
                score: d.score,
            });
        }
        Ok(())
    }

    /// Sum of the dimension scores. Backends are asked to make
    /// `overall_score` match this, but nothing enforces it.
    pub fn dimension_total(&self) -> i64 {
        self.dimensions.iter().map(|d| d.score).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_result;

    #[test]
    fn platform_labels_roundtrip() {
        for p in [
            Platform::TikTok,
            Platform::InstagramReel,
            Platform::MetaAd,
            Platform::YouTubeShort,
        ] {
            assert_eq!(Platform::from_label(p.label()), p);
        }
    }

    #[test]
    fn platform_free_text_preserved() {
        let p = Platform::from_label("  Snapchat Spotlight ");
        assert_eq!(p, Platform::Other("Snapchat Spotlight".into()));
        assert_eq!(p.to_string(), "Snapchat Spotlight");
    }

    #[test]
    fn platform_blank_defaults_to_tiktok() {
        assert_eq!(Platform::from_label("   "), Platform::TikTok);
    }

    #[test]
    fn platform_serializes_as_label() {
        let json = serde_json::to_string(&Platform::YouTubeShort).unwrap();
        assert_eq!(json, r#""YouTube Short""#);
        let p: Platform = serde_json::from_str(r#""meta ad""#).unwrap();
        assert_eq!(p, Platform::MetaAd);
    }

    #[test]
    fn blank_hook_rejected() {
        for hook in ["", "   ", "\n\t"] {
            let err = GradeRequest::new(hook, Platform::TikTok, "Beverage").unwrap_err();
            assert_eq!(err.to_string(), "Hook is required");
        }
    }

    #[test]
    fn body_defaults_applied() {
        let body: GradeRequestBody =
            serde_json::from_str(r#"{"hook": "Stop scrolling."}"#).unwrap();
        let req = body.into_request().unwrap();
        assert_eq!(req.platform, Platform::TikTok);
        assert_eq!(req.category, DEFAULT_CATEGORY);
        assert_eq!(req.hook, "Stop scrolling.");
    }

    #[test]
    fn body_without_hook_rejected() {
        let body: GradeRequestBody = serde_json::from_str(r#"{"platform": "TikTok"}"#).unwrap();
        assert!(matches!(
            body.into_request(),
            Err(HookgradeError::InvalidRequest(_))
        ));
    }

    #[test]
    fn wrong_typed_fields_read_as_absent() {
        let body: GradeRequestBody =
            serde_json::from_str(r#"{"hook": 123, "platform": 7, "category": ["a"]}"#).unwrap();
        assert!(body.hook.is_none());
        assert!(body.platform.is_none());
        assert!(body.category.is_none());
        assert!(matches!(
            body.into_request(),
            Err(HookgradeError::InvalidRequest(_))
        ));

        let body: GradeRequestBody =
            serde_json::from_str(r#"{"hook": "Stop scrolling.", "platform": 7, "category": null}"#)
                .unwrap();
        let req = body.into_request().unwrap();
        assert_eq!(req.platform, Platform::TikTok);
        assert_eq!(req.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn non_object_value_is_empty_body() {
        for value in [serde_json::json!("hook"), serde_json::json!(42), serde_json::json!(null)] {
            let body = GradeRequestBody::from_json_value(value);
            assert!(body.hook.is_none());
        }
    }

    #[test]
    fn result_parses_camel_case() {
        let json = serde_json::to_value(fallback_result()).unwrap();
        assert!(json.get("overallScore").is_some());
        assert!(json.get("overall_score").is_none());
    }

    #[test]
    fn fractional_score_fails_to_parse() {
        let mut json = serde_json::to_value(fallback_result()).unwrap();
        json["overallScore"] = serde_json::json!(71.5);
        assert!(serde_json::from_value::<GradeResult>(json).is_err());
    }

    #[test]
    fn validate_accepts_fallback() {
        assert_eq!(fallback_result().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_wrong_counts() {
        let mut r = fallback_result();
        r.dimensions.pop();
        assert_eq!(r.validate(), Err(ShapeError::DimensionCount(4)));

        let mut r = fallback_result();
        r.alternatives.push(r.alternatives[0].clone());
        assert_eq!(r.validate(), Err(ShapeError::AlternativeCount(6)));
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let mut r = fallback_result();
        r.overall_score = 101;
        assert_eq!(r.validate(), Err(ShapeError::OverallOutOfRange(101)));

        let mut r = fallback_result();
        r.overall_score = -1;
        assert!(r.validate().is_err());

        let mut r = fallback_result();
        r.dimensions[2].score = 21;
        assert_eq!(
            r.validate(),
            Err(ShapeError::DimensionOutOfRange {
                name: "Emotional Trigger".into(),
                score: 21,
            })
        );
    }

    #[test]
    fn overall_mismatch_is_not_enforced() {
        let mut r = fallback_result();
        r.overall_score = 10;
        assert_ne!(r.overall_score, r.dimension_total());
        assert!(r.validate().is_ok());
    }
}
