//! Product catalog: the read-only index over the bulk product feed and the
//! search engine that matches furniture selections against it.
//!
//! # Module Structure
//!
//! - `model`: catalog records (`Product`, `ProductMatch`, `CatalogStats`)
//! - `domain`: retailer domain normalization
//! - `index`: `ProductIndex`, built once from the feed
//! - `search`: `SearchEngine` with its fallback and prioritization chain

mod domain;
mod index;
mod model;
mod search;

pub use domain::normalize_domain;
pub use index::ProductIndex;
pub use model::{CatalogStats, Product, ProductMatch};
pub use search::{
    CandidateSource, MATCHES_PER_SELECTION, PRICE_TOLERANCE, PriceFilter, SearchEngine,
    SearchOutcome, SearchQuery,
};
