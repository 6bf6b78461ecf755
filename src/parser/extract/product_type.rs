use crate::config::Catalog;

/// First catalog type whose keyword occurs in the title, or empty.
pub fn extract(title: &str, catalog: &Catalog) -> String {
    let lower = title.to_lowercase();
    catalog
        .product_types
        .iter()
        .find(|t| t.keywords.iter().any(|k| lower.contains(&k.to_lowercase())))
        .map(|t| t.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(title: &str) -> String {
        extract(title, &Catalog::default())
    }

    #[test]
    fn matches_keyword() {
        assert_eq!(kind("Молоко Яготинське 2.5% 900мл"), "молоко");
        assert_eq!(kind("Яйця курячі С1 10 шт"), "яйця");
        assert_eq!(kind("Продукт кисломолочний 5% 350 г"), "творог");
    }

    #[test]
    fn declared_order_wins() {
        // both "молоко" and "згущене" occur; молоко is declared first
        assert_eq!(kind("Молоко згущене 8.5% 370 г"), "молоко");
    }

    #[test]
    fn keyword_with_trailing_space() {
        assert_eq!(kind("Сир твердий 45% 200 г"), "сир");
        // "сирок" must not be caught by the "сир " keyword
        assert_eq!(kind("Сирок глазурований 36 г"), "сирок");
    }

    #[test]
    fn no_match_is_empty() {
        assert_eq!(kind("Хліб житній 400 г"), "");
    }
}
