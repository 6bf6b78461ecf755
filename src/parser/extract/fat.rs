use std::sync::LazyLock;

use super::rules::{first_match, Rule};
use super::text::to_num;

static FAT_RULES: LazyLock<Vec<Rule<()>>> = LazyLock::new(|| {
    vec![
        // a minus glued to the digits marks a discount badge, parsed as negative;
        // a minus after a digit is a range separator
        Rule::plain(r"(?:^|[^0-9.,])(-)?([0-9]+(?:[.,][0-9]+)?)\s*%"),
        Rule::plain(r"(?i)()жир[^0-9]*([0-9]+(?:[.,][0-9]+)?)"),
    ]
});

pub const MAX_FAT: f64 = 50.0;

/// Fat percentage as a decimal string ("2.5"), or `None`.
pub fn extract(title: &str) -> Option<String> {
    first_match(&FAT_RULES, title, |_, caps| {
        let digits = caps[2].replace(',', ".");
        let value = to_num(&digits)?;
        let value = if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            -value
        } else {
            value
        };
        (0.0..=MAX_FAT).contains(&value).then_some(digits)
    })
}
