//! Extract a JSON payload from free-text model output.
//!
//! Hosted models often ignore "JSON only" instructions and reply with a
//! fenced block (`` ```json ... ``` ``), sometimes with prose around it.

/// Return the JSON payload inside `input`.
///
/// - A reply that is already a complete JSON object is returned trimmed,
///   even when a string value inside it contains a fence.
/// - Otherwise a fenced block anywhere in the text wins; its info string (`json`,
///   `JSON`, ...) is dropped. An unterminated fence runs to end of input.
/// - Without a fence, prose around a single top-level object is cut away
///   by slicing from the first `{` to the last `}`.
/// - Otherwise the trimmed input is returned unchanged and left for the
///   parser to reject.
pub fn extract_json_payload(input: &str) -> &str {
    let trimmed = input.trim();

    if trimmed.starts_with('{')
        && serde_json::from_str::<serde::de::IgnoredAny>(trimmed).is_ok()
    {
        return trimmed;
    }

    if let Some(open) = trimmed.find("```") {
        let after_open = &trimmed[open + 3..];
        // Skip the info string up to the end of the fence line.
        let body = match after_open.find('\n') {
            Some(nl) if is_info_string(&after_open[..nl]) => &after_open[nl + 1..],
            _ => after_open.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
        let body = match body.find("```") {
            Some(close) => &body[..close],
            None => body,
        };
        return body.trim();
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn is_info_string(line: &str) -> bool {
    line.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
