//! The grading rubric and per-request user message.
//!
//! Every backend receives the same system instruction. It is fixed at
//! compile time and never influenced by caller input.

use hookgrade_types::GradeRequest;

use crate::types::ChatMessage;

/// System instruction sent to every grading backend.
pub const SYSTEM_PROMPT: &str = r#"You are an expert DTC performance marketer and ad creative strategist. You analyze ad hooks: the first 1-3 lines of copy that appear in TikTok, Instagram Reel, Meta, and YouTube Short ads.

You score hooks on 5 dimensions, each worth 0-20 points (total 100):
1. Curiosity Gap: Does this hook create an information gap that makes the viewer NEED to keep watching? Does it promise a reveal, a result, or an answer?
2. Specificity: Does the hook use concrete details (numbers, product names, timeframes, outcomes) rather than vague claims?
3. Emotional Trigger: Does it hit a real emotion such as surprise, frustration, desire, humor, fear of missing out, or disbelief?
4. Pattern Interrupt: Would this make someone stop scrolling? Is it unexpected, contrarian, or visually/linguistically unusual for the platform?
5. Platform Fit: Do the tone, length, and language match how real people talk on the specified platform?

Be honest and specific in your scoring. Don't inflate scores to be nice. A mediocre hook should score 40-55. An excellent hook scores 80+.

For alternatives, generate 5 genuinely different approaches, not just rewording. Each must use a different psychological angle (contrarian, specific result, question, visual setup, hot take, social proof, fear-based, aspirational, etc.). Label each with its angle name.

Return your response as valid JSON only, no markdown, no explanation outside the JSON.
Format:
{
  "overallScore": number,
  "dimensions": [
    { "name": "Curiosity Gap", "score": number, "explanation": "string" },
    { "name": "Specificity", "score": number, "explanation": "string" },
    { "name": "Emotional Trigger", "score": number, "explanation": "string" },
    { "name": "Pattern Interrupt", "score": number, "explanation": "string" },
    { "name": "Platform Fit", "score": number, "explanation": "string" }
  ],
  "alternatives": [
    { "label": "The Contrarian", "hook": "string", "explanation": "string" },
    ... (5 total)
  ]
}"#;

/// The user turn embedding the hook, platform and category.
pub fn user_message(request: &GradeRequest) -> String {
    format!(
        "Hook: \"{}\"\nPlatform: {}\nCategory: {}",
        request.hook, request.platform, request.category
    )
}

/// System + user messages for one grading call.
pub fn grading_messages(request: &GradeRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_message(request)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookgrade_types::grade::DIMENSION_NAMES;
    use hookgrade_types::Platform;

    fn request() -> GradeRequest {
        GradeRequest::new("I was today years old...", Platform::TikTok, "Beverage").unwrap()
    }

    #[test]
    fn user_message_layout() {
        assert_eq!(
            user_message(&request()),
            "Hook: \"I was today years old...\"\nPlatform: TikTok\nCategory: Beverage"
        );
    }

    #[test]
    fn free_text_platform_passed_through() {
        let req = GradeRequest::new("hook", Platform::from_label("Snapchat"), "Tech").unwrap();
        assert!(user_message(&req).contains("Platform: Snapchat"));
    }

    #[test]
    fn rubric_names_every_dimension() {
        for name in DIMENSION_NAMES {
            assert!(SYSTEM_PROMPT.contains(name), "rubric missing {name}");
        }
        assert!(SYSTEM_PROMPT.contains("valid JSON only"));
    }

    #[test]
    fn messages_are_system_then_user() {
        let msgs = grading_messages(&request());
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, "system");
        assert_eq!(msgs[1].role, "user");
    }
}
