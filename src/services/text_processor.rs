// Text Canonicalization Service
// Migrated from the legacy Python preprocessing

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel token substituted for every detected link during
/// canonicalization. The text model was trained on this token.
pub const URL_SENTINEL: &str = "linkurl";

/// Matches embedded links: `scheme://...` up to the next whitespace,
/// or a bare `www.` host.
fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:[a-z][a-z0-9+.\-]*://\S+|www\.\S+)").unwrap())
}

fn whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Canonical form of a text submission: lower-cased, whitespace-collapsed,
/// links replaced by [`URL_SENTINEL`]. The raw link substrings never
/// survive into `text`; they are retained in `urls` for independent
/// URL-model scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalText {
    pub text: String,
    pub urls: Vec<String>,
}

/// Canonicalize raw correspondence text.
/// 1. Capture every substring matching the link pattern.
/// 2. Replace each match with the sentinel token.
/// 3. Collapse whitespace runs to single spaces, trim, lower-case.
pub fn canonicalize(raw: &str) -> CanonicalText {
    let urls: Vec<String> = url_pattern()
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect();

    let substituted = url_pattern().replace_all(raw, URL_SENTINEL);

    let text = whitespace_pattern()
        .replace_all(substituted.trim(), " ")
        .to_lowercase();

    CanonicalText { text, urls }
}

/// True when the text holds nothing scoreable after trimming.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
