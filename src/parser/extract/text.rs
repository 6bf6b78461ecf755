use std::sync::LazyLock;

use regex::Regex;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PRICE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,4}(?:[.,][0-9]{2})?\s*(?:грн|₴)").unwrap());

pub const TITLE_MAX_CHARS: usize = 150;
pub const TITLE_MIN_CHARS: usize = 5;

/// Single line, runs of whitespace collapsed to one space, trimmed.
pub fn collapse_whitespace(text: &str) -> String {
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// Drop every `<number> грн|₴` token.
pub fn strip_prices(text: &str) -> String {
    collapse_whitespace(&PRICE_TOKEN_RE.replace_all(text, " "))
}

/// Product title from an element's raw text, or `None` when too short to be one.
pub fn extract_title(raw: &str) -> Option<String> {
    let without_price = strip_prices(&collapse_whitespace(raw));
    let title: String = without_price.chars().take(TITLE_MAX_CHARS).collect();
    let title = title.trim();
    if title.chars().count() < TITLE_MIN_CHARS {
        return None;
    }
    Some(title.to_string())
}

/// Parse a number written with either decimal separator.
pub fn to_num(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
