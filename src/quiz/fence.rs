//! Markdown code-fence stripping
//!
//! Models are asked for bare JSON but regularly wrap it in a fenced code
//! block anyway. This strips the wrapper so the payload can be parsed.

const FENCE: &str = "```";

/// Remove a leading ```` ```lang ```` marker and the last ```` ``` ````
///
/// Text after the closing fence is dropped with it. Text without an opening
/// fence is returned trimmed. The language tag on
/// the opening line (`json`, `JSON`, nothing) is dropped along with the fence.
///
/// # Examples
///
/// ```
/// use awsquiz::quiz::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        // Single-line fence: "```json{...}```"
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    // Anything after the closing fence is chatter, not payload
    match body.rfind(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const QUIZ: &str = r#"{"question":"Q","options":["A","B","C","D"],"answer":"A"}"#;

    #[test]
    fn test_unfenced_text_is_trimmed() {
        assert_eq!(strip_code_fence(QUIZ), QUIZ);
        assert_eq!(strip_code_fence(&format!("\n  {}\n", QUIZ)), QUIZ);
    }

    #[test]
    fn test_json_fence_removed() {
        let fenced = format!("```json\n{}\n```", QUIZ);
        assert_eq!(strip_code_fence(&fenced), QUIZ);
    }

    #[test]
    fn test_bare_fence_removed() {
        let fenced = format!("```\n{}\n```", QUIZ);
        assert_eq!(strip_code_fence(&fenced), QUIZ);
    }

    #[test]
    fn test_fence_with_surrounding_whitespace() {
        let fenced = format!("\n\n```JSON\n{}\n```\n\n", QUIZ);
        assert_eq!(strip_code_fence(&fenced), QUIZ);
    }

    #[test]
    fn test_single_line_fence() {
        let fenced = format!("```json{}```", QUIZ);
        assert_eq!(strip_code_fence(&fenced), QUIZ);
    }

    #[test]
    fn test_missing_closing_fence_still_strips_opening() {
        let fenced = format!("```json\n{}", QUIZ);
        assert_eq!(strip_code_fence(&fenced), QUIZ);
    }

    #[test]
    fn test_trailing_text_after_closing_fence_dropped() {
        let fenced = format!("```json\n{}\n```\nHope this helps!", QUIZ);
        assert_eq!(strip_code_fence(&fenced), QUIZ);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_code_fence(""), "");
        assert_eq!(strip_code_fence("```json\n```"), "");
    }

    #[test]
    fn test_backticks_inside_payload_are_kept() {
        let payload = r#"{"question":"What does `aws s3 ls` do?"}"#;
        let fenced = format!("```json\n{}\n```", payload);
        assert_eq!(strip_code_fence(&fenced), payload);
    }

    proptest! {
        #[test]
        fn prop_fenced_and_unfenced_agree(body in "[a-zA-Z0-9{}\\[\\]\":,. ]{0,80}") {
            let fenced = format!("```json\n{}\n```", body);
            prop_assert_eq!(strip_code_fence(&fenced), strip_code_fence(&body));
        }

        #[test]
        fn prop_stripping_is_idempotent(body in "[a-zA-Z0-9{}\":,. \n]{0,80}") {
            let once = strip_code_fence(&body);
            prop_assert_eq!(strip_code_fence(once), once);
        }
    }
}
