pub mod brand;
pub mod fat;
pub mod pack;
pub mod price;
pub mod product_type;
pub mod rating;
pub mod rules;
pub mod text;
pub mod unit_price;

use crate::config::Catalog;
use crate::storage::{PageContext, ProductRecord};

/// One hypothesised product listing: its own text and its container's text.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub text: String,
    pub container_text: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>, container_text: impl Into<String>) -> Self {
        Candidate {
            text: text.into(),
            container_text: container_text.into(),
        }
    }

    /// Element text followed by container text; prices are searched here.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.text, self.container_text)
    }
}

/// Build a record from one candidate, or `None` when it is not a product
/// (title too short, or no price in range).
pub fn assemble(candidate: &Candidate, ctx: &PageContext, catalog: &Catalog) -> Option<ProductRecord> {
    let title = text::extract_title(&candidate.text)?;
    let full_text = candidate.full_text();
    let prices = price::analyze(&full_text)?;

    let pack = pack::extract(&format!("{} {}", title, full_text));

    Some(ProductRecord {
        upload_ts: ctx.upload_ts.clone(),
        page_url: ctx.page_url.clone(),
        page_number: ctx.page_number,
        source: ctx.source.clone(),
        brand: brand::extract(&title, catalog),
        product_type: product_type::extract(&title, catalog),
        fat_pct: fat::extract(&title),
        pack_qty: pack.qty,
        pack_unit: pack.unit,
        price_current: prices.current,
        price_old: prices.old,
        discount_pct: prices.discount_pct,
        price_per_l_or_kg_or_piece: unit_price::per_unit(prices.current, &pack),
        rating: rating::extract(&title),
        price_type: prices.price_type,
        product_title: title,
    })
}

// ── Tests ──
