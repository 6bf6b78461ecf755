use std::sync::LazyLock;

use super::rules::{first_match, Rule};
use super::text::to_num;

static RATING_RULES: LazyLock<Vec<Rule<()>>> = LazyLock::new(|| {
    vec![
        Rule::plain(r"★\s*([1-5](?:[.,][0-9])?)"),
        Rule::plain(r"(?i)(?:⭐|рейтинг:?)\s*([1-5](?:[.,][0-9])?)"),
        Rule::plain(r"([1-5](?:[.,][0-9])?)\s*(?:★|⭐)"),
    ]
});

pub fn extract(text: &str) -> Option<f64> {
    first_match(&RATING_RULES, text, |_, caps| {
        to_num(&caps[1]).filter(|r| (1.0..=5.0).contains(r))
    })
}
