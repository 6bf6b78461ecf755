use regex::{Captures, Regex};

/// A pattern plus whatever the extractor needs to interpret its matches.
pub struct Rule<M> {
    pub pattern: Regex,
    pub meta: M,
}

impl<M> Rule<M> {
    pub fn new(pattern: &str, meta: M) -> Self {
        Rule {
            pattern: Regex::new(pattern).unwrap(),
            meta,
        }
    }
}

impl Rule<()> {
    pub fn plain(pattern: &str) -> Self {
        Rule::new(pattern, ())
    }
}

/// Rules in declared order, matches of one rule in text order.
/// The first match `convert` accepts wins; a rejected match just moves on.
pub fn first_match<M, T>(
    rules: &[Rule<M>],
    text: &str,
    mut convert: impl FnMut(&M, &Captures<'_>) -> Option<T>,
) -> Option<T> {
    for rule in rules {
        for caps in rule.pattern.captures_iter(text) {
            if let Some(value) = convert(&rule.meta, &caps) {
                return Some(value);
            }
        }
    }
    None
}

/// Every accepted match of one pattern, in text order.
pub fn all_matches<T>(
    pattern: &Regex,
    text: &str,
    mut convert: impl FnMut(&Captures<'_>) -> Option<T>,
) -> Vec<T> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| convert(&caps))
        .collect()
}
