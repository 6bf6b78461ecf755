use std::sync::LazyLock;

use regex::Regex;

use super::rules::all_matches;
use super::text::to_num;
use crate::storage::PriceType;

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2,4}(?:[.,][0-9]{2})?)\s*(?:грн|₴)").unwrap());
static DISCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\s*([0-9]{1,2})%").unwrap());

/// Prices outside this open interval are sizes, percentages and other noise.
pub const MIN_PRICE: f64 = 5.0;
pub const MAX_PRICE: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceInfo {
    pub current: f64,
    pub old: Option<f64>,
    pub discount_pct: Option<u32>,
    pub price_type: PriceType,
}

pub fn is_valid_price(price: f64) -> bool {
    price > MIN_PRICE && price < MAX_PRICE
}

/// All currency-tagged prices in scan order, noise removed.
pub fn find_prices(text: &str) -> Vec<f64> {
    all_matches(&PRICE_RE, text, |caps| {
        to_num(&caps[1]).filter(|p| is_valid_price(*p))
    })
}

/// Classify the prices of one candidate. `None` means "not a product".
///
/// Old price is simply the second price found, with no check that it is
/// higher than the current one. Listings that print prices in an unusual
/// order therefore get an old price below the current price.
pub fn analyze(text: &str) -> Option<PriceInfo> {
    let prices = find_prices(text);
    let current = *prices.first()?;

    let discount = DISCOUNT_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    match (discount, prices.get(1)) {
        (Some(pct), Some(&old)) => Some(PriceInfo {
            current,
            old: Some(old),
            discount_pct: Some(pct),
            price_type: PriceType::Discount,
        }),
        _ => Some(PriceInfo {
            current,
            old: None,
            discount_pct: None,
            price_type: PriceType::Regular,
        }),
    }
}
