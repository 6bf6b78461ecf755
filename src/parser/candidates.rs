use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::extract::Candidate;

/// Tried in order; the first one matching enough elements is used.
pub const SELECTORS: &[&str] = &[
    "h3",
    r#"[class*="product"]"#,
    r#"[class*="item"]"#,
    r#"a[href*="/product/"]"#,
    "div.product",
];

/// A selector must match more than this many elements to count as a listing.
pub const MIN_ELEMENTS: usize = 3;

static INLINE_PRODUCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w\s\-.'ʼ’`]{5,200}?\s*[0-9]{1,4}(?:[.,][0-9]{2})?\s*(?:грн|₴)").unwrap()
});

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Every element matching `selector`, paired with its parent's text.
pub fn select(doc: &Html, selector: &str) -> Vec<Candidate> {
    let sel = match Selector::parse(selector) {
        Ok(sel) => sel,
        Err(e) => {
            warn!("Invalid selector {}: {}", selector, e);
            return Vec::new();
        }
    };
    doc.select(&sel)
        .map(|el| {
            let container = el
                .parent()
                .and_then(ElementRef::wrap)
                .map(element_text)
                .unwrap_or_default();
            Candidate::new(element_text(el), container)
        })
        .collect()
}

/// Fallback for markup no selector understands: `<title text> <price> грн`
/// spans straight from the raw HTML, without container text.
pub fn scan_inline(html: &str) -> Vec<Candidate> {
    INLINE_PRODUCT_RE
        .find_iter(html)
        .map(|m| Candidate::new(m.as_str(), ""))
        .collect()
}
