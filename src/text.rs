use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on article characters handed to the prompt. The runtime's
/// context is 2048 tokens and the template has to fit alongside.
pub const MAX_ARTICLE_CHARS: usize = 4000;

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").expect("citation pattern is valid"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static BULLET_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\* .*").expect("bullet pattern is valid"));

/// Strips `[n]` citation markers, collapses whitespace, trims, then keeps
/// the first `MAX_ARTICLE_CHARS` characters.
pub fn clean_text(raw: &str) -> String {
    let without_citations = CITATION.replace_all(raw, "");
    let collapsed = WHITESPACE.replace_all(&without_citations, " ");
    truncate_chars(collapsed.trim(), MAX_ARTICLE_CHARS).to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Keeps the `* ` bullet lines of a completion. Falls back to the whole
/// completion when the model ignored the bullet format.
pub fn extract_bullets(raw_output: &str) -> String {
    let bullets: Vec<&str> = BULLET_LINE.find_iter(raw_output).map(|m| m.as_str()).collect();

    if bullets.is_empty() {
        raw_output.trim().to_string()
    } else {
        bullets.join("\n").trim().to_string()
    }
}

/// Number of `* ` bullet lines in a completion.
pub fn count_bullets(raw_output: &str) -> usize {
    BULLET_LINE.find_iter(raw_output).count()
}
