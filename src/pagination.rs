use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

static PAGE_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").unwrap());
static PAGE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a[^>]*href="[^"]*page=(\d+)[^"]*"[^>]*>.*?(\d+).*?</a>"#).unwrap()
});

/// Fallback page count when pagination exists but can't be read.
pub const DEFAULT_PAGES: usize = 10;

fn max_page(re: &Regex, html: &str) -> Option<usize> {
    re.captures_iter(html)
        .filter_map(|c| c[1].parse::<usize>().ok())
        .max()
}

/// Number of pages to scrape, judged from the first page's markup.
pub fn detect_last_page(html: &str, max_pages: usize) -> usize {
    if let Some(n) = max_page(&PAGE_PARAM_RE, html).filter(|n| *n <= max_pages) {
        info!("Found pagination via URL params: {} pages", n);
        return n.max(1);
    }

    if let Some(n) = max_page(&PAGE_LINK_RE, html).filter(|n| *n <= max_pages) {
        info!("Found pagination via link text: {} pages", n);
        return n.max(1);
    }

    if html.contains("page=") {
        info!("Found pagination markers");
        return DEFAULT_PAGES.min(max_pages);
    }

    warn!("No pagination detected, using a single page");
    1
}

/// Page 1 is the bare category URL, later pages add `page=N`.
pub fn page_urls(base_url: &str, pages: usize) -> Vec<String> {
    let sep = if base_url.contains('?') { '&' } else { '?' };
    (1..=pages)
        .map(|p| {
            if p == 1 {
                base_url.to_string()
            } else {
                format!("{}{}page={}", base_url, sep, p)
            }
        })
        .collect()
}
