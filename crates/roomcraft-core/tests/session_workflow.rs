//! Drives a `Session` through the workflow with in-process collaborators.

use async_trait::async_trait;
use roomcraft_core::catalog::{
    CandidateSource, MATCHES_PER_SELECTION, PriceFilter, Product, ProductIndex, SearchEngine,
    SearchQuery,
};
use roomcraft_core::collaborator::{DimensionEstimator, check_estimate};
use roomcraft_core::config::DesignConfig;
use roomcraft_core::error::Result;
use roomcraft_core::session::{FurnitureDimensions, FurnitureSelection, Session, Stage};
use std::sync::Arc;

struct SquareEstimator(f64);

#[async_trait]
impl DimensionEstimator for SquareEstimator {
    async fn estimate(&self, _: &str, _: &str, _: f64) -> Result<FurnitureDimensions> {
        let side = self.0.sqrt();
        Ok(FurnitureDimensions {
            width: side,
            depth: side,
            height: 2.5,
            area: self.0,
        })
    }
}

fn product(name: &str, price: f64, website: &str, subtype: &str) -> Product {
    Product {
        name: name.to_string(),
        link: format!("{website}/p/{name}"),
        price,
        image_url: String::new(),
        website: website.to_string(),
        product_type: "Chairs".to_string(),
        subtype: subtype.to_string(),
    }
}

async fn place(session: &mut Session, config: &DesignConfig, area: f64) -> Result<f64> {
    let room_area = session.require_area("add furniture")?;
    let estimate = SquareEstimator(area).estimate("Chairs", "Armchair", room_area).await?;
    let dims = check_estimate(estimate, &config.estimate_bounds)?;
    let budget = session.add_furniture(
        FurnitureSelection::new("Chairs", "Armchair", dims),
        config.max_room_usage_percent,
    )?;
    Ok(budget.usage_percent)
}

#[tokio::test]
async fn twenty_by_twenty_room_rejects_the_item_that_breaks_the_cap() {
    let config = DesignConfig::default();
    let mut session = Session::new("https://cdn.example.com/room.jpg");
    session.set_room_type("Living Room Furniture", &config).unwrap();
    session.set_theme("modern living", &config).unwrap();
    session.set_dimensions(20.0, 20.0, 9.0, config.max_room_usage_percent).unwrap();

    assert_eq!(place(&mut session, &config, 100.0).await.unwrap(), 25.0);

    let err = place(&mut session, &config, 200.0).await.unwrap_err();
    assert!(err.is_capacity());
    assert_eq!(session.furniture_selections.len(), 1);
    assert_eq!(session.total_area_used, 100.0);
    assert_eq!(session.stage, Stage::FurnitureSelecting);
}

#[tokio::test]
async fn oversized_estimate_never_reaches_the_session() {
    let config = DesignConfig::default();
    let mut session = Session::new("img");
    session.set_room_type("Kitchen", &config).unwrap();
    session.set_theme("MODERN MEDITERRANEAN", &config).unwrap();
    session.set_dimensions(30.0, 30.0, 9.0, config.max_room_usage_percent).unwrap();

    // 21 x 21 ft exceeds the 20 ft width bound.
    let err = place(&mut session, &config, 441.0).await.unwrap_err();
    assert!(err.is_estimation());
    assert!(session.furniture_selections.is_empty());
}

#[test]
fn search_keeps_the_only_candidate_below_the_band() {
    let engine = SearchEngine::new(Arc::new(ProductIndex::build(vec![product(
        "stool",
        74.0,
        "https://www.sklum.com",
        "Stool",
    )])));

    let outcome = engine.search(&SearchQuery {
        product_type: "Chairs",
        subtype: "Stool",
        theme_domains: &[],
        min_price: 100.0,
        max_price: 200.0,
        limit: MATCHES_PER_SELECTION,
    });
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.price_filter, PriceFilter::Widened);
    assert_eq!(outcome.matches[0].website, "sklum.com");
}

#[test]
fn search_without_subtype_hits_uses_the_whole_type() {
    let engine = SearchEngine::new(Arc::new(ProductIndex::build(vec![
        product("a", 120.0, "https://ikea.com", "Armchair"),
        product("b", 130.0, "https://loaf.com", "Dining chair"),
    ])));
    let theme = vec!["loaf.com".to_string()];

    let outcome = engine.search(&SearchQuery {
        product_type: "Chairs",
        subtype: "Rocking chair",
        theme_domains: &theme,
        min_price: 100.0,
        max_price: 200.0,
        limit: MATCHES_PER_SELECTION,
    });
    assert_eq!(outcome.source, CandidateSource::TypeFallback);
    let names: Vec<&str> = outcome.matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
    assert!(outcome.matches.iter().all(|m| m.subtype == "Rocking chair"));
}
