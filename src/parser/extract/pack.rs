use std::sync::LazyLock;

use serde::Serialize;

use super::rules::{first_match, Rule};
use super::text::to_num;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackUnit {
    #[serde(rename = "мл")]
    Ml,
    #[serde(rename = "г")]
    G,
    #[serde(rename = "шт")]
    Pcs,
}

impl PackUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            PackUnit::Ml => "мл",
            PackUnit::G => "г",
            PackUnit::Pcs => "шт",
        }
    }
}

impl std::fmt::Display for PackUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Package size, always in мл / г / шт.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pack {
    pub qty: Option<u32>,
    pub unit: Option<PackUnit>,
}

struct UnitRule {
    unit: PackUnit,
    multiplier: f64,
}

static PACK_RULES: LazyLock<Vec<Rule<UnitRule>>> = LazyLock::new(|| {
    let rule = |pattern: &str, unit, multiplier| Rule::new(pattern, UnitRule { unit, multiplier });
    vec![
        rule(r"(?i)([0-9]+(?:[.,][0-9]+)?)\s*л\b", PackUnit::Ml, 1000.0),
        rule(r"(?i)([0-9]{2,4})\s*мл\b", PackUnit::Ml, 1.0),
        rule(r"(?i)([0-9]{2,4})\s*г\b", PackUnit::G, 1.0),
        rule(r"(?i)([0-9]{1,2})\s*шт", PackUnit::Pcs, 1.0),
        rule(r"(?i)([0-9]{2,4})\s*кг", PackUnit::G, 1000.0),
    ]
});

/// First pack-size rule that matches anywhere in `text`.
pub fn extract(text: &str) -> Pack {
    first_match(&PACK_RULES, text, |rule, caps| {
        let n = to_num(&caps[1])?;
        let qty = (n * rule.multiplier).round();
        Some(Pack {
            qty: (qty >= 1.0 && qty <= u32::MAX as f64).then_some(qty as u32),
            unit: Some(rule.unit),
        })
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(text: &str) -> (Option<u32>, Option<&'static str>) {
        let p = extract(text);
        (p.qty, p.unit.map(PackUnit::as_str))
    }

    #[test]
    fn litres_become_millilitres() {
        assert_eq!(pack("Молоко 1.5 л"), (Some(1500), Some("мл")));
        assert_eq!(pack("Молоко 0,9л"), (Some(900), Some("мл")));
        assert_eq!(pack("Кефір 1 Л"), (Some(1000), Some("мл")));
    }

    #[test]
    fn millilitres_and_grams() {
        assert_eq!(pack("Молоко Яготинське 2.5% 900мл"), (Some(900), Some("мл")));
        assert_eq!(pack("Сир твердий 200 г"), (Some(200), Some("г")));
    }

    #[test]
    fn kilograms_become_grams() {
        assert_eq!(pack("Сир кисломолочний 10 кг"), (Some(10000), Some("г")));
    }

    #[test]
    fn pieces() {
        assert_eq!(pack("Яйця курячі 10 шт"), (Some(10), Some("шт")));
        assert_eq!(pack("Сирок 5шт."), (Some(5), Some("шт")));
    }

    #[test]
    fn table_order_beats_text_order() {
        // гram token comes first in the text, the litre rule is tried first
        assert_eq!(pack("Набір 200 г + напій 1 л"), (Some(1000), Some("мл")));
    }

    #[test]
    fn zero_quantity_keeps_unit() {
        assert_eq!(pack("Пробник 0 л"), (None, Some("мл")));
        assert_eq!(pack("00 г"), (None, Some("г")));
    }

    #[test]
    fn price_currency_is_not_a_gram() {
        assert_eq!(pack("Кефір 45.50 грн"), (None, None));
    }

    #[test]
    fn no_size() {
        assert_eq!(pack("Сир твердий"), (None, None));
        assert_eq!(extract(""), Pack::default());
    }
}
