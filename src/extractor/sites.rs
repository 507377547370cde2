/// Substrings that mark a URL as a supported marketplace product page.
const MARKETPLACE_TOKENS: [&str; 2] = ["amazon", "amzn.in"];

/// Plain substring test on the raw URL; no parsing, so it never fails.
pub fn is_supported(url: &str) -> bool {
    MARKETPLACE_TOKENS.iter().any(|token| url.contains(token))
}
