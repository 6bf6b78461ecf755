use std::sync::LazyLock;

use regex::Regex;

use crate::config::Catalog;

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"«([^»]{2,30})»").unwrap());
static LEADING_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-ZА-ЯЁІЇЄҐ][\p{L}\-'ʼ’`]{1,25})(?:\s|$)").unwrap()
});

/// Brand from a normalized title; empty when nothing looks like one.
pub fn extract(title: &str, catalog: &Catalog) -> String {
    if let Some(caps) = QUOTED_RE.captures(title) {
        return caps[1].to_string();
    }

    let lower = title.to_lowercase();
    if let Some(brand) = catalog
        .brands
        .iter()
        .find(|b| lower.contains(&b.to_lowercase()))
    {
        return brand.clone();
    }

    LEADING_WORD_RE
        .captures(title)
        .map(|caps| caps[1].to_string())
        .filter(|word| word.chars().count() > 2)
        .filter(|word| !catalog.generic_nouns.iter().any(|n| n == word))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(title: &str) -> String {
        extract(title, &Catalog::default())
    }

    #[test]
    fn guillemets_win_over_catalog() {
        assert_eq!(brand("Кефір «Простоквашино» Галичина 2.5% 900 г"), "Простоквашино");
        assert_eq!(brand("Йогурт «Своя лінія» 280 г"), "Своя лінія");
    }

    #[test]
    fn guillemets_length_bounds() {
        // one char inside is too short, fall through to the catalog
        assert_eq!(brand("Сир «Х» Ферма 200 г"), "Ферма");
    }

    #[test]
    fn catalog_is_case_insensitive() {
        assert_eq!(brand("Молоко ЯГОТИНСЬКЕ 2.5% 900мл"), "Яготинське");
        assert_eq!(brand("Напій alpro соєвий 1 л"), "Alpro");
    }

    #[test]
    fn catalog_order_breaks_ties() {
        // "Біло" is listed before "Білоцерківське" and is a prefix of it
        assert_eq!(brand("Молоко Білоцерківське 3.2% 1 л"), "Біло");
    }

    #[test]
    fn leading_word_fallback() {
        assert_eq!(brand("Лавка традицій сир 200 г"), "Лавка");
        assert_eq!(brand("Organic milk 1 л"), "Organic");
    }

    #[test]
    fn generic_nouns_are_not_brands() {
        assert_eq!(brand("Молоко пастеризоване 2.5% 900мл"), "");
        assert_eq!(brand("Вершки 10% 200 г"), "");
    }

    #[test]
    fn short_or_lowercase_leading_word_rejected() {
        assert_eq!(brand("Ох сир 200 г"), "");
        assert_eq!(brand("сир твердий 200 г"), "");
        assert_eq!(brand("2 яйця"), "");
    }

    #[test]
    fn custom_catalog_is_used() {
        let catalog = Catalog {
            brands: vec!["Lavka".into()],
            product_types: Vec::new(),
            generic_nouns: vec!["Сир".into()],
        };
        assert_eq!(extract("Сир lavka 200 г", &catalog), "Lavka");
        assert_eq!(extract("Сир твердий 200 г", &catalog), "");
    }
}
