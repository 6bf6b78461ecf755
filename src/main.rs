mod config;
mod fetch;
mod pagination;
mod parser;
mod storage;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use config::{Catalog, ScraperConfig};
use storage::{LogEntry, PageContext, ProductRecord};

#[derive(Parser)]
#[command(name = "silpo_scraper", about = "Silpo category scraper: product listings to CSV")]
struct Cli {
    /// JSON file replacing the built-in brand / product-type catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the category and append products to the data CSV
    Run {
        /// Max pages to scrape (default: 10)
        #[arg(short = 'n', long)]
        pages: Option<usize>,
        /// Category URL to start from
        #[arg(long)]
        base_url: Option<String>,
        /// Seconds to wait between page requests
        #[arg(long)]
        delay: Option<f64>,
    },
    /// Parse a saved HTML page and print its products as CSV
    Parse {
        file: PathBuf,
        /// URL recorded as page_url
        #[arg(long)]
        page_url: Option<String>,
        /// Page number recorded as page_number
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Show data file statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::default(),
    };
    let mut cfg = ScraperConfig::from_env();

    match cli.command {
        Commands::Run { pages, base_url, delay } => {
            if let Some(n) = pages {
                cfg.max_pages = n;
            }
            if let Some(url) = base_url {
                cfg.base_url = url;
            }
            if let Some(secs) = delay {
                cfg.request_delay = Duration::try_from_secs_f64(secs)
                    .context("--delay must be a non-negative number of seconds")?;
            }
            run(&cfg, &catalog).await
        }
        Commands::Parse { file, page_url, page } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let ctx = PageContext {
                upload_ts: Utc::now().to_rfc3339(),
                page_url: page_url.unwrap_or_else(|| cfg.base_url.clone()),
                page_number: page,
                source: cfg.source.clone(),
            };
            let products = parser::extract_products(&html, &ctx, &catalog);
            storage::write_products(std::io::stdout().lock(), &products)?;
            info!("{} products in {}", products.len(), file.display());
            Ok(())
        }
        Commands::Stats => {
            let path = cfg.data_file();
            match storage::statistics(&path)? {
                Some(s) => {
                    println!("File:         {}", path.display());
                    println!("Rows:         {}", s.total_rows);
                    println!("Size:         {:.2} KB", s.file_size_kb);
                    println!("Last updated: {}", s.last_updated.format("%Y-%m-%d %H:%M:%S UTC"));
                }
                None => println!("No data file at {}. Run 'run' first.", path.display()),
            }
            Ok(())
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct RunStats {
    total_products: usize,
    pages_success: usize,
    pages_failed: usize,
    pages_processed: usize,
    elapsed_time: f64,
}

/// Append a run-log row; a broken log file never stops the scrape.
fn log_event(path: &Path, entry: LogEntry) {
    if let Err(e) = storage::append_log(path, &entry) {
        warn!("Failed to append log: {:#}", e);
    }
}

async fn run(cfg: &ScraperConfig, catalog: &Catalog) -> Result<()> {
    let t0 = Instant::now();
    let batch_stamp = Utc::now().to_rfc3339();
    info!("Starting Silpo scraper, batch {}", batch_stamp);
    info!("Max pages: {}", cfg.max_pages);

    let log_file = cfg.log_file();
    storage::ensure_files(&cfg.data_file(), &log_file)?;

    let mut stats = RunStats::default();
    let result = scrape_category(cfg, catalog, &batch_stamp, &mut stats).await;
    stats.elapsed_time = t0.elapsed().as_secs_f64();

    match result {
        Ok(()) => {
            info!("Scraper completed");
            info!("  Total products: {}", stats.total_products);
            info!("  Pages success:  {}", stats.pages_success);
            info!("  Pages failed:   {}", stats.pages_failed);
            info!("  Elapsed time:   {:.2}s", stats.elapsed_time);
            log_event(
                &log_file,
                LogEntry::success("DONE", "run_scraper", serde_json::to_string(&stats)?, "N/A"),
            );
            Ok(())
        }
        Err(e) => {
            error!("Critical error: {:#}", e);
            log_event(&log_file, LogEntry::failed("CRITICAL_ERROR", "run_scraper", format!("{:#}", e), "N/A"));
            Err(e)
        }
    }
}

async fn scrape_category(
    cfg: &ScraperConfig,
    catalog: &Catalog,
    batch_stamp: &str,
    stats: &mut RunStats,
) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let log_file = cfg.log_file();
    let fetcher = fetch::Fetcher::new(cfg)?;

    // Connectivity probe; its body doubles as page 1
    info!("Testing connectivity to {}", cfg.base_url);
    let first_page = match fetcher.fetch_page(&cfg.base_url, 2).await {
        Ok(html) => html,
        Err(e) => bail!("Cannot reach {} - website may be blocked or down: {:#}", cfg.base_url, e),
    };

    let last_page = pagination::detect_last_page(&first_page, cfg.max_pages);
    let urls = pagination::page_urls(&cfg.base_url, last_page);
    info!("Scraping {} pages (max {})", urls.len(), cfg.max_pages);

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({eta})")?
            .progress_chars("=> "),
    );

    let mut all_products: Vec<ProductRecord> = Vec::new();
    let total = urls.len();

    for (i, url) in urls.iter().enumerate() {
        let page_number = i + 1;
        stats.pages_processed = page_number;
        let stage = format!("page_{}/{}", page_number, total);
        info!("Page {}/{}: {}", page_number, total, url);

        let html = if i == 0 {
            Ok(first_page.clone())
        } else {
            fetcher.fetch_page(url, cfg.retry_attempts).await
        };

        match html {
            Ok(html) => {
                let ctx = PageContext {
                    upload_ts: batch_stamp.to_string(),
                    page_url: url.clone(),
                    page_number,
                    source: cfg.source.clone(),
                };
                let products = parser::extract_products(&html, &ctx, catalog);
                if products.is_empty() {
                    warn!("  No products extracted");
                } else {
                    stats.pages_success += 1;
                    info!("  {} products found", products.len());
                    log_samples(&products);
                }
                log_event(
                    &log_file,
                    LogEntry::success("PARSE", &stage, format!("Extracted {} products", products.len()), url),
                );
                all_products.extend(products);
            }
            Err(e) => {
                stats.pages_failed += 1;
                error!("  Failed: {:#}", e);
                log_event(&log_file, LogEntry::failed("ERROR", &format!("page_{}", page_number), format!("{:#}", e), url));
            }
        }
        pb.inc(1);

        if page_number < total {
            tokio::time::sleep(cfg.request_delay).await;
        }
    }
    pb.finish_and_clear();

    if all_products.is_empty() {
        warn!("No products to save");
        return Ok(());
    }

    let data_file = cfg.data_file();
    let written = storage::append_products(&data_file, &all_products)?;
    stats.total_products = written;
    info!("Saved {} products to {}", written, data_file.display());
    log_event(
        &log_file,
        LogEntry::success("WRITE", "save_csv", format!("Written {} products", written), "N/A"),
    );
    Ok(())
}

fn log_samples(products: &[ProductRecord]) {
    for (j, p) in products.iter().take(3).enumerate() {
        let title: String = p.product_title.chars().take(50).collect();
        let qty = p.pack_qty.map(|q| q.to_string()).unwrap_or_default();
        let unit = p.pack_unit.map(|u| u.to_string()).unwrap_or_default();
        info!("    [{}] {} | {}₴ | {}{}", j + 1, title, p.price_current, qty, unit);
    }
    if products.len() > 3 {
        info!("    ... and {} more", products.len() - 3);
    }
}
