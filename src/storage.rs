use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::parser::extract::pack::PackUnit;

pub const CSV_HEADERS: &[&str] = &[
    "upload_ts",
    "page_url",
    "page_number",
    "source",
    "product_title",
    "brand",
    "product_type",
    "fat_pct",
    "pack_qty",
    "pack_unit",
    "price_current",
    "price_old",
    "discount_pct",
    "price_per_l_or_kg_or_piece",
    "rating",
    "price_type",
];

pub const LOG_HEADERS: &[&str] = &["ts", "step", "stage", "message", "url", "status"];

/// Caller-supplied context attached to every record of a page.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub upload_ts: String,
    pub page_url: String,
    pub page_number: usize,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Regular,
    Discount,
}

/// One product row. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub upload_ts: String,
    pub page_url: String,
    pub page_number: usize,
    pub source: String,
    pub product_title: String,
    pub brand: String,
    pub product_type: String,
    pub fat_pct: Option<String>,
    pub pack_qty: Option<u32>,
    pub pack_unit: Option<PackUnit>,
    pub price_current: f64,
    pub price_old: Option<f64>,
    pub discount_pct: Option<u32>,
    pub price_per_l_or_kg_or_piece: Option<f64>,
    pub rating: Option<f64>,
    pub price_type: PriceType,
}

/// One row of the run log.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub ts: String,
    pub step: String,
    pub stage: String,
    pub message: String,
    pub url: String,
    pub status: String,
}

impl LogEntry {
    pub fn success(step: &str, stage: &str, message: impl Into<String>, url: &str) -> Self {
        Self::new(step, stage, message.into(), url, "success")
    }

    pub fn failed(step: &str, stage: &str, message: impl Into<String>, url: &str) -> Self {
        Self::new(step, stage, message.into(), url, "failed")
    }

    fn new(step: &str, stage: &str, message: String, url: &str, status: &str) -> Self {
        LogEntry {
            ts: Utc::now().to_rfc3339(),
            step: step.to_string(),
            stage: stage.to_string(),
            message,
            url: url.to_string(),
            status: status.to_string(),
        }
    }
}

pub struct FileStats {
    pub total_rows: usize,
    pub last_updated: DateTime<Utc>,
    pub file_size_kb: f64,
}

/// Create parent directories and header-only files where missing.
pub fn ensure_files(data_file: &Path, log_file: &Path) -> Result<()> {
    for (path, headers) in [(data_file, CSV_HEADERS), (log_file, LOG_HEADERS)] {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        if !path.exists() {
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            wtr.write_record(headers)?;
            wtr.flush()?;
            info!("Created {}", path.display());
        }
    }
    Ok(())
}

fn append_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for append", path.display()))?;
    Ok(csv::WriterBuilder::new().has_headers(false).from_writer(file))
}

pub fn append_products(path: &Path, products: &[ProductRecord]) -> Result<usize> {
    if products.is_empty() {
        return Ok(0);
    }
    let mut wtr = append_writer(path)?;
    for p in products {
        wtr.serialize(p)?;
    }
    wtr.flush()?;
    info!("Appended {} products to {}", products.len(), path.display());
    Ok(products.len())
}

pub fn append_log(path: &Path, entry: &LogEntry) -> Result<()> {
    let mut wtr = append_writer(path)?;
    wtr.serialize(entry)?;
    wtr.flush()?;
    Ok(())
}

/// Write records with a header row to any writer (used for stdout).
pub fn write_products<W: std::io::Write>(out: W, products: &[ProductRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for p in products {
        wtr.serialize(p)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn statistics(path: &Path) -> Result<Option<FileStats>> {
    if !path.exists() {
        return Ok(None);
    }
    let meta = std::fs::metadata(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut total_rows = 0;
    for record in rdr.records() {
        record?;
        total_rows += 1;
    }
    Ok(Some(FileStats {
        total_rows,
        last_updated: DateTime::<Utc>::from(meta.modified()?),
        file_size_kb: (meta.len() as f64 / 1024.0 * 100.0).round() / 100.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ProductRecord {
        ProductRecord {
            upload_ts: "2026-01-01T00:00:00+00:00".into(),
            page_url: "https://silpo.ua/category/x?page=2".into(),
            page_number: 2,
            source: "https://silpo.ua".into(),
            product_title: title.into(),
            brand: "Галичина".into(),
            product_type: "молоко".into(),
            fat_pct: Some("2.5".into()),
            pack_qty: Some(900),
            pack_unit: Some(PackUnit::Ml),
            price_current: 45.5,
            price_old: None,
            discount_pct: None,
            price_per_l_or_kg_or_piece: Some(50.56),
            rating: None,
            price_type: PriceType::Regular,
        }
    }

    #[test]
    fn ensure_files_writes_headers_once() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data/raw.csv");
        let log = dir.path().join("logs/log.csv");
        ensure_files(&data, &log).unwrap();
        ensure_files(&data, &log).unwrap();

        let text = std::fs::read_to_string(&data).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.trim_end(), CSV_HEADERS.join(","));
        let log_text = std::fs::read_to_string(&log).unwrap();
        assert_eq!(log_text.trim_end(), "ts,step,stage,message,url,status");
    }

    #[test]
    fn append_products_matches_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("raw.csv");
        let log = dir.path().join("log.csv");
        ensure_files(&data, &log).unwrap();
        append_products(&data, &[record("Молоко Галичина 2.5% 900мл")]).unwrap();

        let text = std::fs::read_to_string(&data).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "2026-01-01T00:00:00+00:00,https://silpo.ua/category/x?page=2,2,https://silpo.ua,\
             Молоко Галичина 2.5% 900мл,Галичина,молоко,2.5,900,мл,45.5,,,50.56,,regular"
        );
    }

    #[test]
    fn titles_with_commas_and_quotes_are_escaped() {
        let mut out = Vec::new();
        write_products(&mut out, &[record("Сир \"Гауда\", 45%")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Сир \"\"Гауда\"\", 45%\""));
    }

    #[test]
    fn statistics_counts_rows_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("raw.csv");
        let log = dir.path().join("log.csv");
        assert!(statistics(&data).unwrap().is_none());

        ensure_files(&data, &log).unwrap();
        append_products(&data, &[record("a, multi\nline title"), record("plain title")]).unwrap();
        append_log(&log, &LogEntry::success("WRITE", "save_csv", "Written 2 products", "N/A")).unwrap();

        let stats = statistics(&data).unwrap().unwrap();
        assert_eq!(stats.total_rows, 2);
        assert!(stats.file_size_kb > 0.0);
        let log_stats = statistics(&log).unwrap().unwrap();
        assert_eq!(log_stats.total_rows, 1);
    }
}
