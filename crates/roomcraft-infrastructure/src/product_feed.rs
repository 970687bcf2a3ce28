//! Product feed loading.
//!
//! The retailer feed is a JSON document, either `{"data": [...]}` as served
//! by the product API or a bare array. Records use the feed's own key names
//! and are mapped onto [`Product`] here so the core never sees them.

use roomcraft_core::catalog::{Product, ProductIndex};
use roomcraft_core::error::{Result, RoomcraftError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// A product record as delivered by the feed. Missing keys default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    pub product_name: String,
    pub product_link: String,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    pub product_image: String,
    pub website_link: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub sub_types: String,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            name: record.product_name,
            link: record.product_link,
            price: record.price_usd,
            image_url: record.product_image,
            website: record.website_link,
            product_type: record.product_type,
            subtype: record.sub_types,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Wrapped { data: Vec<ProductRecord> },
    Bare(Vec<ProductRecord>),
}

/// Parses a feed document into products, in feed order.
pub fn parse_feed(json: &str) -> Result<Vec<Product>> {
    let document: FeedDocument = serde_json::from_str(json)?;
    let records = match document {
        FeedDocument::Wrapped { data } => data,
        FeedDocument::Bare(records) => records,
    };
    Ok(records.into_iter().map(Product::from).collect())
}

/// Reads a feed from a local JSON file.
pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<Product>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_feed(&content)?;
    tracing::info!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}

/// Fetches a feed over HTTP.
pub async fn load_from_url(url: &str, timeout: Duration) -> Result<Vec<Product>> {
    tracing::info!("Loading products from {}", url);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RoomcraftError::internal(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RoomcraftError::upstream(format!("Product feed request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(RoomcraftError::upstream(format!(
            "Product feed returned HTTP {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| RoomcraftError::upstream(format!("Failed to read product feed: {e}")))?;
    let products = parse_feed(&body)?;
    tracing::info!("Loaded {} products", products.len());
    Ok(products)
}

/// Loads the feed from `source` and builds the index in one step.
///
/// `source` is treated as a URL when it starts with `http://` or `https://`
/// and as a file path otherwise.
pub async fn load_index(source: &str, timeout: Duration) -> Result<ProductIndex> {
    let products = if source.starts_with("http://") || source.starts_with("https://") {
        load_from_url(source, timeout).await?
    } else {
        load_from_file(source).await?
    };
    Ok(ProductIndex::build(products))
}
