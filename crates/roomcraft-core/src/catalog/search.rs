//! Furniture search over the product index.
//!
//! The matching chain is fixed:
//!
//! 1. candidates by type+subtype, falling back to type only
//! 2. price band of ±[`PRICE_TOLERANCE`] around the requested range, widened
//!    back to every candidate when the band is empty
//! 3. products from the theme's retailers first, the rest after
//! 4. truncation to the requested limit

use super::domain::normalize_domain;
use super::index::ProductIndex;
use super::model::{Product, ProductMatch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Fractional slack applied below the minimum and above the maximum price.
pub const PRICE_TOLERANCE: f64 = 0.25;

/// Matches kept per furniture selection when a session searches.
pub const MATCHES_PER_SELECTION: usize = 3;

/// A single furniture lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery<'a> {
    pub product_type: &'a str,
    pub subtype: &'a str,
    pub theme_domains: &'a [String],
    pub min_price: f64,
    pub max_price: f64,
    pub limit: usize,
}

/// Which candidate bucket produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Exact type and subtype match
    Subtype,
    /// No product for the subtype; every product of the type was used
    TypeFallback,
    /// The type has no products at all
    None,
}

/// Whether the price band narrowed the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFilter {
    /// At least one candidate fell inside the band
    Applied,
    /// Nothing fell inside the band, so all candidates were kept
    Widened,
}

/// Result of a search, including which soft fallbacks fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub matches: Vec<ProductMatch>,
    pub source: CandidateSource,
    pub price_filter: PriceFilter,
    /// Number of results coming from theme retailers
    pub theme_matches: usize,
}

impl SearchOutcome {
    fn empty() -> Self {
        Self {
            matches: Vec::new(),
            source: CandidateSource::None,
            price_filter: PriceFilter::Applied,
            theme_matches: 0,
        }
    }
}

/// Stateless matcher over a shared [`ProductIndex`].
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: Arc<ProductIndex>,
}

impl SearchEngine {
    pub fn new(index: Arc<ProductIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &ProductIndex {
        &self.index
    }

    pub fn search(&self, query: &SearchQuery<'_>) -> SearchOutcome {
        tracing::debug!(
            "Searching {} > {} (price {:.0}-{:.0})",
            query.product_type,
            query.subtype,
            query.min_price,
            query.max_price
        );

        let (candidates, source) = self.candidates(query.product_type, query.subtype);
        if candidates.is_empty() {
            tracing::warn!("No products found for type '{}'", query.product_type);
            return SearchOutcome::empty();
        }

        let (in_budget, price_filter) =
            filter_by_price(candidates, query.min_price, query.max_price);

        let theme_domains: HashSet<&str> = query
            .theme_domains
            .iter()
            .map(|d| normalize_domain(d))
            .collect();
        let (theme, others): (Vec<&Product>, Vec<&Product>) = in_budget
            .into_iter()
            .partition(|p| theme_domains.contains(normalize_domain(&p.website)));

        let theme_matches = theme.len().min(query.limit);
        tracing::debug!(
            "{} from theme websites, {} from others",
            theme.len(),
            others.len()
        );

        let matches = theme
            .into_iter()
            .chain(others)
            .take(query.limit)
            .map(|p| to_match(p, query.product_type, query.subtype))
            .collect();

        SearchOutcome {
            matches,
            source,
            price_filter,
            theme_matches,
        }
    }

    fn candidates(&self, product_type: &str, subtype: &str) -> (Vec<&Product>, CandidateSource) {
        let exact = self.index.by_type_subtype(product_type, subtype);
        if !exact.is_empty() {
            return (exact, CandidateSource::Subtype);
        }

        let by_type = self.index.by_type(product_type);
        if by_type.is_empty() {
            return (by_type, CandidateSource::None);
        }

        tracing::warn!(
            "No exact subtype match for '{}', searching by type '{}'",
            subtype,
            product_type
        );
        (by_type, CandidateSource::TypeFallback)
    }
}

fn filter_by_price(candidates: Vec<&Product>, min_price: f64, max_price: f64) -> (Vec<&Product>, PriceFilter) {
    let lower = min_price * (1.0 - PRICE_TOLERANCE);
    let upper = max_price * (1.0 + PRICE_TOLERANCE);

    let in_budget: Vec<&Product> = candidates
        .iter()
        .copied()
        .filter(|p| (lower..=upper).contains(&p.price))
        .collect();

    if in_budget.is_empty() {
        tracing::warn!(
            "No products within {:.0}-{:.0}, using all {} candidates",
            lower,
            upper,
            candidates.len()
        );
        (candidates, PriceFilter::Widened)
    } else {
        (in_budget, PriceFilter::Applied)
    }
}

fn to_match(product: &Product, product_type: &str, subtype: &str) -> ProductMatch {
    ProductMatch {
        name: product.name.clone(),
        link: product.link.clone(),
        price: product.price,
        image_url: product.image_url.clone(),
        website: normalize_domain(&product.website).to_string(),
        product_type: product_type.to_string(),
        subtype: subtype.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(name: &str, website: &str, subtype: &str, price: f64) -> Product {
        Product {
            name: name.to_string(),
            link: format!("https://{website}/{name}"),
            price,
            image_url: format!("https://{website}/{name}.jpg"),
            website: format!("https://www.{website}/"),
            product_type: "Sofas".to_string(),
            subtype: subtype.to_string(),
        }
    }

    fn engine(products: Vec<Product>) -> SearchEngine {
        SearchEngine::new(Arc::new(ProductIndex::build(products)))
    }

    fn query<'a>(subtype: &'a str, themes: &'a [String], limit: usize) -> SearchQuery<'a> {
        SearchQuery {
            product_type: "Sofas",
            subtype,
            theme_domains: themes,
            min_price: 100.0,
            max_price: 200.0,
            limit,
        }
    }

    fn names(outcome: &SearchOutcome) -> Vec<&str> {
        outcome.matches.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn exact_subtype_match_wins_over_type() {
        let engine = engine(vec![
            product("a", "heals.com", "Corner sofa", 150.0),
            product("b", "heals.com", "3-seater sofa", 150.0),
        ]);
        let outcome = engine.search(&query("3-seater sofa", &[], 5));

        assert_eq!(outcome.source, CandidateSource::Subtype);
        assert_eq!(names(&outcome), vec!["b"]);
    }

    #[test]
    fn falls_back_to_type_when_subtype_is_missing() {
        let engine = engine(vec![
            product("a", "heals.com", "Corner sofa", 150.0),
            product("b", "dusk.com", "Chaise", 120.0),
        ]);
        let outcome = engine.search(&query("Loveseat", &[], 5));

        assert_eq!(outcome.source, CandidateSource::TypeFallback);
        assert_eq!(names(&outcome), vec!["a", "b"]);
        assert!(outcome.matches.iter().all(|m| m.subtype == "Loveseat"));
    }

    #[test]
    fn unknown_type_is_an_empty_result() {
        let engine = engine(vec![product("a", "heals.com", "Corner sofa", 150.0)]);
        let mut q = query("Corner sofa", &[], 5);
        q.product_type = "Lamps";
        let outcome = engine.search(&q);

        assert_eq!(outcome.source, CandidateSource::None);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn price_band_includes_twenty_five_percent_below_min() {
        let engine = engine(vec![
            product("at-75", "heals.com", "Chaise", 75.0),
            product("at-74", "heals.com", "Chaise", 74.0),
            product("at-250", "heals.com", "Chaise", 250.0),
            product("at-251", "heals.com", "Chaise", 251.0),
        ]);
        let outcome = engine.search(&query("Chaise", &[], 10));

        assert_eq!(outcome.price_filter, PriceFilter::Applied);
        assert_eq!(names(&outcome), vec!["at-75", "at-250"]);
    }

    #[test]
    fn empty_band_widens_to_all_candidates() {
        let engine = engine(vec![product("cheap", "heals.com", "Chaise", 74.0)]);
        let outcome = engine.search(&query("Chaise", &[], 3));

        assert_eq!(outcome.price_filter, PriceFilter::Widened);
        assert_eq!(names(&outcome), vec!["cheap"]);
    }

    #[test]
    fn theme_retailers_come_first_and_results_are_truncated() {
        let engine = engine(vec![
            product("other-1", "sklum.com", "Chaise", 150.0),
            product("theme-1", "kavehome.com", "Chaise", 150.0),
            product("other-2", "oka.com", "Chaise", 150.0),
            product("theme-2", "heals.com", "Chaise", 150.0),
        ]);
        let themes = vec!["https://www.heals.com".to_string(), "kavehome.com".to_string()];
        let outcome = engine.search(&query("Chaise", &themes, 3));

        assert_eq!(names(&outcome), vec!["theme-1", "theme-2", "other-1"]);
        assert_eq!(outcome.theme_matches, 2);
        assert_eq!(outcome.matches[0].website, "kavehome.com");
    }

    proptest! {
        #[test]
        fn theme_matches_always_precede_others(
            flags in proptest::collection::vec(any::<bool>(), 0..20),
            limit in 0usize..25,
        ) {
            let products: Vec<Product> = flags
                .iter()
                .enumerate()
                .map(|(i, &is_theme)| {
                    let site = if is_theme { "heals.com" } else { "sklum.com" };
                    product(&format!("p{i}"), site, "Chaise", 150.0)
                })
                .collect();
            let engine = engine(products);
            let themes = vec!["heals.com".to_string()];
            let outcome = engine.search(&query("Chaise", &themes, limit));

            prop_assert_eq!(outcome.matches.len(), flags.len().min(limit));
            let first_other = outcome
                .matches
                .iter()
                .position(|m| m.website != "heals.com")
                .unwrap_or(outcome.matches.len());
            prop_assert!(outcome.matches[first_other..].iter().all(|m| m.website != "heals.com"));
            prop_assert_eq!(outcome.theme_matches, first_other);
        }
    }
}
