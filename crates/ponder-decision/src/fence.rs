//! Code-fence and language-tag stripping.

/// Language tags models put on the opening fence or alone on the first line.
const LANGUAGE_TAGS: [&str; 5] = ["json", "json5", "text", "plaintext", "markdown"];

/// Remove a surrounding ```` ``` ```` fence, its language tag, and a bare
/// leading language-tag line. Text without a fence is only trimmed.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let body = match rest.split_once('\n') {
            Some((tag, body)) if is_tag_line(tag) => body,
            Some(_) => rest,
            // Single-line fence: ```json {"answer": "x"}```
            None => strip_tag_prefix(rest),
        };
        let body = body.trim_end();
        text = body.strip_suffix("```").unwrap_or(body).trim();
    }

    if let Some((first, body)) = text.split_once('\n') {
        if LANGUAGE_TAGS.iter().any(|tag| first.trim().eq_ignore_ascii_case(tag)) {
            text = body.trim();
        }
    }

    text
}

fn is_tag_line(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

fn strip_tag_prefix(text: &str) -> &str {
    for tag in LANGUAGE_TAGS {
        if text.get(..tag.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag)) {
            let rest = &text[tag.len()..];
            if rest.starts_with(char::is_whitespace) {
                return rest;
            }
        }
    }
    text
}
