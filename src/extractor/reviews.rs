use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

// Collapsed review bodies on the product page.
static PRIMARY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"div[data-hook="review-collapsed"]"#).unwrap());

// Review text spans on the dedicated reviews page and older layouts.
static FALLBACK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.review-text-content").unwrap());

/// Review bodies found in `html`, in document order.
///
/// The fallback selector is only consulted when the primary one matches no
/// element at all.
pub fn collect_reviews(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut matched: Vec<ElementRef> = document.select(&PRIMARY_SELECTOR).collect();
    if matched.is_empty() {
        debug!("Primary review selector matched nothing, trying fallback");
        matched = document.select(&FALLBACK_SELECTOR).collect();
    }

    matched
        .into_iter()
        .map(stripped_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Space-joined review text, or `None` when the page has no reviews.
pub fn join_reviews(html: &str) -> Option<String> {
    let reviews = collect_reviews(html);
    if reviews.is_empty() {
        return None;
    }
    Some(reviews.join(" "))
}

// Elements whose text content never renders.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

// Visible text nodes trimmed, empty ones skipped, the rest concatenated.
fn stripped_text(element: ElementRef) -> String {
    let mut text = String::new();
    push_visible_text(element, &mut text);
    text
}

fn push_visible_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(node) = child.value().as_text() {
            out.push_str(node.trim());
        } else if let Some(child) = ElementRef::wrap(child) {
            if !HIDDEN_TAGS.contains(&child.value().name()) {
                push_visible_text(child, out);
            }
        }
    }
}
