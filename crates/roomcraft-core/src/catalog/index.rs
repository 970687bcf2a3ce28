//! Read-only product index.

use super::domain::normalize_domain;
use super::model::{CatalogStats, Product};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Type or subtype values the feed uses for unclassified products.
const UNKNOWN_CATEGORY: &str = "Unknown";

/// Lookup structures over the product feed.
///
/// Built in a single pass at construction and never mutated afterwards, so a
/// shared `Arc<ProductIndex>` can be read from any number of tasks without
/// locking. The maps store positions into `products`; every accessor hands
/// out borrowed products in feed order.
#[derive(Debug, Default)]
pub struct ProductIndex {
    products: Vec<Product>,
    by_domain: HashMap<String, Vec<usize>>,
    by_type: HashMap<String, Vec<usize>>,
    by_type_subtype: HashMap<String, HashMap<String, Vec<usize>>>,
}

impl ProductIndex {
    /// Indexes the feed by normalized domain, by type, and by type+subtype.
    pub fn build(products: Vec<Product>) -> Self {
        let mut by_domain: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_type: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_type_subtype: HashMap<String, HashMap<String, Vec<usize>>> = HashMap::new();

        for (position, product) in products.iter().enumerate() {
            by_domain
                .entry(normalize_domain(&product.website).to_string())
                .or_default()
                .push(position);
            by_type
                .entry(product.product_type.clone())
                .or_default()
                .push(position);
            by_type_subtype
                .entry(product.product_type.clone())
                .or_default()
                .entry(product.subtype.clone())
                .or_default()
                .push(position);
        }

        let index = Self {
            products,
            by_domain,
            by_type,
            by_type_subtype,
        };
        tracing::info!("Indexed product feed: {}", index.stats());
        index
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products sold by `domain`. The argument is normalized first.
    pub fn by_domain(&self, domain: &str) -> Vec<&Product> {
        self.resolve(self.by_domain.get(normalize_domain(domain)))
    }

    pub fn by_type(&self, product_type: &str) -> Vec<&Product> {
        self.resolve(self.by_type.get(product_type))
    }

    pub fn by_type_subtype(&self, product_type: &str, subtype: &str) -> Vec<&Product> {
        self.resolve(
            self.by_type_subtype
                .get(product_type)
                .and_then(|subtypes| subtypes.get(subtype)),
        )
    }

    pub fn has_type(&self, product_type: &str) -> bool {
        self.by_type.contains_key(product_type)
    }

    /// All furniture types, sorted.
    pub fn available_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.by_type.keys().cloned().collect();
        types.sort();
        types
    }

    /// Subtypes recorded under `product_type`, sorted.
    pub fn available_subtypes(&self, product_type: &str) -> Vec<String> {
        let mut subtypes: Vec<String> = self
            .by_type_subtype
            .get(product_type)
            .map(|subtypes| subtypes.keys().cloned().collect())
            .unwrap_or_default();
        subtypes.sort();
        subtypes
    }

    /// Types whose name contains `token`, ignoring case. Used for
    /// "did you mean" hints when a requested type is unknown.
    pub fn similar_types(&self, token: &str) -> Vec<String> {
        let needle = token.to_lowercase();
        self.available_types()
            .into_iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            products: self.products.len(),
            websites: self.by_domain.len(),
            types: self.by_type.len(),
        }
    }

    /// Types and their subtypes offered by the given retailer domains.
    ///
    /// Products with an empty or `Unknown` type or subtype are skipped.
    pub fn theme_catalog<S: AsRef<str>>(&self, domains: &[S]) -> BTreeMap<String, BTreeSet<String>> {
        let mut catalog: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for product in self.theme_products(domains) {
            if is_unclassified(&product.product_type) || is_unclassified(&product.subtype) {
                continue;
            }
            catalog
                .entry(product.product_type.clone())
                .or_default()
                .insert(product.subtype.clone());
        }
        catalog
    }

    /// Subtypes of `product_type` (matched case-insensitively) offered by the
    /// given retailer domains.
    pub fn theme_subtypes<S: AsRef<str>>(&self, domains: &[S], product_type: &str) -> BTreeSet<String> {
        let wanted = product_type.to_lowercase();
        self.theme_products(domains)
            .filter(|p| p.product_type.to_lowercase() == wanted && !p.subtype.is_empty())
            .map(|p| p.subtype.clone())
            .collect()
    }

    /// Products from the given domains, in domain order then feed order.
    fn theme_products<'a, S: AsRef<str>>(
        &'a self,
        domains: &'a [S],
    ) -> impl Iterator<Item = &'a Product> + 'a {
        let mut seen = BTreeSet::new();
        domains
            .iter()
            .map(|d| normalize_domain(d.as_ref()))
            .filter(move |d| seen.insert(d.to_string()))
            .flat_map(move |d| self.by_domain(d))
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&Product> {
        positions
            .map(|positions| positions.iter().map(|&i| &self.products[i]).collect())
            .unwrap_or_default()
    }
}

fn is_unclassified(value: &str) -> bool {
    value.is_empty() || value == UNKNOWN_CATEGORY
}
