pub mod candidates;
pub mod extract;

use std::collections::HashSet;

use rayon::prelude::*;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::config::Catalog;
use crate::storage::{PageContext, ProductRecord};
use extract::Candidate;

/// Pages shorter than this are error stubs, not listings.
pub const MIN_HTML_CHARS: usize = 1000;

/// Two-strategy pipeline: CSS selectors first, inline regex scan as fallback.
/// Records come back in document order.
pub fn extract_products(html: &str, ctx: &PageContext, catalog: &Catalog) -> Vec<ProductRecord> {
    let chars = html.chars().count();
    if chars < MIN_HTML_CHARS {
        warn!("HTML too short to parse ({} chars)", chars);
        return Vec::new();
    }

    let products = extract_with_selectors(html, ctx, catalog);
    if !products.is_empty() {
        return products;
    }

    let products = extract_inline(html, ctx, catalog);
    if products.is_empty() {
        warn!("No products extracted using any strategy");
    } else {
        info!("Inline scan found {} products", products.len());
    }
    products
}

fn assemble_all(candidates: &[Candidate], ctx: &PageContext, catalog: &Catalog) -> Vec<ProductRecord> {
    candidates
        .par_iter()
        .filter_map(|c| extract::assemble(c, ctx, catalog))
        .collect()
}

fn extract_with_selectors(html: &str, ctx: &PageContext, catalog: &Catalog) -> Vec<ProductRecord> {
    let doc = Html::parse_document(html);

    for selector in candidates::SELECTORS {
        let found = candidates::select(&doc, selector);
        if found.len() <= candidates::MIN_ELEMENTS {
            continue;
        }
        debug!("Using selector {} ({} elements)", selector, found.len());
        let products = assemble_all(&found, ctx, catalog);
        if !products.is_empty() {
            info!("Selector {} found {} products", selector, products.len());
            return products;
        }
    }
    Vec::new()
}

fn extract_inline(html: &str, ctx: &PageContext, catalog: &Catalog) -> Vec<ProductRecord> {
    let found = candidates::scan_inline(html);
    let mut seen = HashSet::new();
    assemble_all(&found, ctx, catalog)
        .into_iter()
        .filter(|p| seen.insert(p.product_title.clone()))
        .collect()
}

// ── Tests ──
