//! Catalog records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product from the retailer feed.
///
/// `website` keeps the raw link as delivered by the feed; comparisons go
/// through [`normalize_domain`](super::normalize_domain).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub link: String,
    pub price: f64,
    pub image_url: String,
    pub website: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub subtype: String,
}

/// A search hit returned to the workflow.
///
/// `product_type` / `subtype` are the values that were requested, which may
/// differ from the product's own subtype when the type-only fallback fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub name: String,
    pub link: String,
    pub price: f64,
    pub image_url: String,
    /// Normalized retailer domain
    pub website: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub subtype: String,
}

/// Counts describing a built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub products: usize,
    pub websites: usize,
    pub types: usize,
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} products, {} websites, {} categories",
            self.products, self.websites, self.types
        )
    }
}
