use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

use crate::renderer::errors::RenderError;

const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

/// Decode an HTML body to UTF-8.
///
/// Precedence: `Content-Type` charset, then a `<meta ... charset=...>` in the
/// first 4KB, then statistical detection.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<String, RenderError> {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_WINDOW)]);
    let encoding = encoding_from(&HEADER_CHARSET, content_type)
        .or_else(|| encoding_from(&META_CHARSET, &head))
        .unwrap_or_else(|| {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(&body[..body.len().min(SNIFF_WINDOW)], false);
            detector.guess(None, true)
        });

    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        return Err(RenderError::Charset(format!(
            "body is not valid {}",
            used.name()
        )));
    }
    Ok(decoded.into_owned())
}

fn encoding_from(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?;
    Encoding::for_label(label.as_str().trim().as_bytes())
}
