const FENCE: &str = "```";

/// Remove a surrounding code fence from model output.
///
/// Only the opening fence line (with an optional language tag such as `json`)
/// and a closing fence at the very end are removed. Interior content is never
/// touched.
pub(crate) fn strip_code_fence(input: &str) -> &str {
    let mut text = input.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = match rest.split_once('\n') {
            // Anything on the fence line is a language tag.
            Some((_tag, body)) => body,
            None => strip_inline_tag(rest),
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Single-line fences like "```json{...}```" carry the tag directly before the body.
fn strip_inline_tag(rest: &str) -> &str {
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let after = &rest[tag_len..];
    if after.trim_start().starts_with(['{', '[']) {
        after
    } else {
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn strips_tagged_fence() {
        let raw = "```json\n{\"mcqs\":[]}\n```";
        assert_eq!(strip_code_fence(raw), "{\"mcqs\":[]}");
    }

    #[test]
    fn strips_untagged_fence_with_trailing_whitespace() {
        let raw = "\n```\n[1, 2]\n```\n\n";
        assert_eq!(strip_code_fence(raw), "[1, 2]");
    }

    #[test]
    fn strips_single_line_fence() {
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn interior_fences_survive() {
        let raw = "```\nQuestion: what does ``` mean?\n```";
        assert_eq!(strip_code_fence(raw), "Question: what does ``` mean?");
    }

    #[test]
    fn missing_closing_fence_is_fine() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "{\"a\":1}");
    }
}
