use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const BASE_URL: &str = "https://silpo.ua/category/molochni-produkty-ta-iaitsia-234";
const SOURCE: &str = "https://silpo.ua";
const MAX_PAGES: usize = 10;
const REQUEST_DELAY_MS: u64 = 1500;
const RETRY_DELAY_MS: u64 = 2000;
const RETRY_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const DATA_FILE_NAME: &str = "silpo_raw.csv";
const LOG_FILE_NAME: &str = "silpo_log.csv";

/// Runtime settings for one scraper run.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub source: String,
    pub max_pages: usize,
    pub request_delay: Duration,
    /// First retry waits this long; attempt `n` waits `n` times as long.
    pub retry_delay: Duration,
    pub retry_attempts: u32,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            source: SOURCE.to_string(),
            max_pages: MAX_PAGES,
            request_delay: Duration::from_millis(REQUEST_DELAY_MS),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
            retry_attempts: RETRY_ATTEMPTS,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            data_dir: PathBuf::from("data"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

impl ScraperConfig {
    /// Defaults, then `SILPO_BASE_URL` / `SILPO_DATA_DIR` / `SILPO_LOGS_DIR`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("SILPO_BASE_URL") {
            cfg.base_url = url;
        }
        if let Ok(dir) = std::env::var("SILPO_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("SILPO_LOGS_DIR") {
            cfg.logs_dir = PathBuf::from(dir);
        }
        cfg
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join(LOG_FILE_NAME)
    }
}

/// One canonical product type and the title keywords that select it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductType {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Lookup tables used by the extractors. Order matters everywhere:
/// the first brand / type / keyword hit wins.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub brands: Vec<String>,
    pub product_types: Vec<ProductType>,
    /// Leading title words that name a category, never a brand.
    #[serde(default)]
    pub generic_nouns: Vec<String>,
}

const KNOWN_BRANDS: &[&str] = &[
    // local
    "Яготинське",
    "Ферма",
    "Галичина",
    "Селянське",
    "ПростоНаше",
    "Премія",
    "Молокія",
    "Бурьонка",
    "На здоров'я",
    "Даніссімо",
    "Активіа",
    "Простоквашино",
    "Чудо",
    "Агуня",
    "Растішка",
    "Ростишка",
    // international
    "Lactel",
    "Actimel",
    "Danone",
    "Muller",
    "Alpro",
    "Valio",
    "Elle&Vire",
    "President",
    "Деліссімо",
    // local premium
    "Біло",
    "Білоцерківське",
    "Тульчинка",
    "Марійка",
    "Злагода",
];

const PRODUCT_TYPES: &[(&str, &[&str])] = &[
    ("молоко", &["молоко"]),
    ("вершки", &["вершки"]),
    ("сир", &["сир "]),
    ("сметана", &["сметана"]),
    ("йогурт", &["йогурт"]),
    ("кефір", &["кефір"]),
    ("ряжанка", &["ряжанка"]),
    ("масло", &["масло"]),
    ("маргарин", &["маргарин"]),
    ("яйця", &["яйце", "яйця"]),
    ("сирок", &["сирок"]),
    ("десерт", &["десерт"]),
    ("творог", &["творог", "кисломолочний"]),
    ("згущене", &["згущене"]),
    ("каша", &["каша", "хлопья"]),
];

const GENERIC_NOUNS: &[&str] = &[
    "Молоко", "Вершки", "Кефір", "Сметана", "Йогурт", "Масло", "Маргарин",
];

impl Default for Catalog {
    fn default() -> Self {
        Self {
            brands: KNOWN_BRANDS.iter().map(|b| b.to_string()).collect(),
            product_types: PRODUCT_TYPES
                .iter()
                .map(|(name, keywords)| ProductType {
                    name: name.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
            generic_nouns: GENERIC_NOUNS.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid catalog JSON")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_keeps_declared_order() {
        let c = Catalog::default();
        assert_eq!(c.brands.first().map(String::as_str), Some("Яготинське"));
        assert_eq!(c.product_types[0].name, "молоко");
        assert_eq!(c.product_types[9].keywords, vec!["яйце", "яйця"]);
        assert_eq!(c.product_types.last().map(|t| t.name.as_str()), Some("каша"));
    }

    #[test]
    fn catalog_from_json_preserves_type_order() {
        let json = r#"{
            "brands": ["Zeta", "Alpha"],
            "product_types": [
                { "name": "сир", "keywords": ["сир "] },
                { "name": "вершки", "keywords": ["вершки"] }
            ]
        }"#;
        let c = Catalog::from_json(json).unwrap();
        assert_eq!(c.brands, vec!["Zeta", "Alpha"]);
        assert_eq!(c.product_types[0].name, "сир");
        assert_eq!(c.product_types[1].name, "вершки");
        assert!(c.generic_nouns.is_empty());
    }

    #[test]
    fn bad_catalog_json_is_an_error() {
        assert!(Catalog::from_json("{ not json").is_err());
    }

    #[test]
    fn file_paths_follow_dirs() {
        let cfg = ScraperConfig {
            data_dir: PathBuf::from("/tmp/d"),
            logs_dir: PathBuf::from("/tmp/l"),
            ..Default::default()
        };
        assert_eq!(cfg.data_file(), PathBuf::from("/tmp/d/silpo_raw.csv"));
        assert_eq!(cfg.log_file(), PathBuf::from("/tmp/l/silpo_log.csv"));
    }
}
