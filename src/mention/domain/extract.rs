//! `@handle` token scanning.

/// Returns the handles mentioned in `text`, deduplicated in encounter order.
///
/// A mention is `@` followed by one or more word characters
/// (`[A-Za-z0-9_]`). Comparison is case-sensitive, so `@Ada` and `@ada` are
/// distinct tokens.
#[must_use]
pub fn extract_handles(text: &str) -> Vec<String> {
    let mut handles: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find('@') {
        let after = rest.get(at + 1..).unwrap_or_default();
        let end = after
            .find(|ch: char| !is_word_char(ch))
            .unwrap_or(after.len());
        let token = after.get(..end).unwrap_or_default();
        if !token.is_empty() && !handles.iter().any(|seen| seen == token) {
            handles.push(token.to_owned());
        }
        rest = after.get(end..).unwrap_or_default();
    }
    handles
}

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
