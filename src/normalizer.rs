//! Text normalization shared by inference and the offline vectorizer fit.
//!
//! The pre-trained vocabulary only ever saw text passed through
//! [`normalize`], so every byte that reaches the feature extractor must go
//! through it as well.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").unwrap());

static NON_LETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z\s]").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, strip tag-like spans, keep only `a-z` and whitespace, then
/// collapse whitespace runs and trim.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let untagged = TAG_REGEX.replace_all(&lowered, "");
    let letters = NON_LETTER_REGEX.replace_all(&untagged, "");
    WHITESPACE_REGEX
        .replace_all(&letters, " ")
        .trim()
        .to_string()
}
