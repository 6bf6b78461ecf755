use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::config::ScraperConfig;

/// Responses shorter than this are error pages or bot challenges.
const MIN_BODY_CHARS: usize = 1000;

const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
    ),
    ("accept-language", "uk-UA,uk;q=0.9,en-US;q=0.8,en;q=0.7,ru;q=0.6"),
    ("cache-control", "max-age=0"),
    ("dnt", "1"),
    ("referer", "https://silpo.ua/"),
    ("sec-ch-ua", "\"Not A(Brand\";v=\"99\", \"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

/// HTTP client with browser headers and linear retry backoff.
pub struct Fetcher {
    client: Client,
    retry_delay: Duration,
}

impl Fetcher {
    pub fn new(cfg: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in BROWSER_HEADERS {
            headers.insert(*name, HeaderValue::from_static(*value));
        }
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(cfg.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Fetcher {
            client,
            retry_delay: cfg.retry_delay,
        })
    }

    /// Fetch a page, retrying up to `max_attempts` times.
    /// Attempt `n` failing waits `retry_delay * n` before the next one.
    pub async fn fetch_page(&self, url: &str, max_attempts: u32) -> Result<String> {
        let mut last_error = anyhow!("no attempts made");

        for attempt in 1..=max_attempts {
            debug!("[Attempt {}/{}] Fetching: {}", attempt, max_attempts, url);
            match self.fetch_once(url).await {
                Ok(html) => {
                    info!("Fetched {} chars from {}", html.len(), url);
                    return Ok(html);
                }
                Err(e) => {
                    warn!("Attempt {} failed: {}", attempt, e);
                    last_error = e;
                }
            }

            if attempt < max_attempts {
                let delay = self.retry_delay * attempt;
                info!("Waiting {:.1}s before retry...", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }
        }

        error!("Failed after {} attempts: {}", max_attempts, last_error);
        Err(last_error.context(format!("Failed to fetch {}", url)))
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(describe)?;
        let status = response.status().as_u16();
        debug!(
            "Status {} ({})",
            status,
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
        );
        let body = response.text().await.map_err(describe)?;
        check_response(status, &body)?;
        Ok(body)
    }
}

fn describe(e: reqwest::Error) -> anyhow::Error {
    if e.is_timeout() {
        anyhow!("Request timeout")
    } else if e.is_connect() {
        anyhow!("Connection error: {}", e)
    } else {
        anyhow!(e)
    }
}

/// Reject error statuses and bodies that are not a real HTML page.
pub fn check_response(status: u16, body: &str) -> Result<()> {
    match status {
        404 => bail!("HTTP 404 - Page not found"),
        403 => bail!("HTTP 403 - Access forbidden (site may be blocking us)"),
        429 => bail!("HTTP 429 - Rate limited (too many requests)"),
        s if s >= 400 => bail!("HTTP {}", s),
        _ => {}
    }

    let chars = body.chars().count();
    if chars < MIN_BODY_CHARS {
        bail!("Empty/short response ({} chars)", chars);
    }

    let head: String = body.chars().take(500).collect();
    if !head.contains("DOCTYPE") && !head.contains("<html") {
        bail!("Response doesn't contain valid HTML");
    }
    Ok(())
}
