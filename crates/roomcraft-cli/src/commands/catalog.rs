use anyhow::{Context, Result};
use roomcraft_core::catalog::{CandidateSource, PriceFilter, ProductIndex, SearchEngine, SearchQuery};
use roomcraft_core::config::DesignConfig;
use roomcraft_infrastructure::product_feed;
use std::sync::Arc;
use std::time::Duration;

const FEED_TIMEOUT: Duration = Duration::from_secs(60);

pub async fn load_index(feed: Option<&str>, config: &DesignConfig) -> Result<ProductIndex> {
    let source = feed
        .or(config.product_feed_url.as_deref())
        .context("No product feed given. Pass --feed or set product_feed_url in the config.")?;
    Ok(product_feed::load_index(source, FEED_TIMEOUT).await?)
}

pub fn stats(index: &ProductIndex) {
    println!("{}", index.stats());
}

pub fn types(index: &ProductIndex, product_type: Option<&str>) {
    match product_type {
        Some(product_type) => {
            let subtypes = index.available_subtypes(product_type);
            if subtypes.is_empty() {
                let similar = index.similar_types(product_type);
                println!("No products of type '{product_type}'.");
                if !similar.is_empty() {
                    println!("Did you mean: {}?", similar.join(", "));
                }
                return;
            }
            for subtype in subtypes {
                println!("{subtype}");
            }
        }
        None => {
            for product_type in index.available_types() {
                println!("{product_type}");
            }
        }
    }
}

pub fn theme(index: &ProductIndex, config: &DesignConfig, name: &str) -> Result<()> {
    let theme = config
        .theme(&name.trim().to_uppercase())
        .with_context(|| format!("Unknown theme '{name}'. Choose from: {}", config.theme_names().join(", ")))?;

    for (product_type, subtypes) in index.theme_catalog(&theme.websites) {
        println!("{product_type}");
        for subtype in subtypes {
            println!("  {subtype}");
        }
    }
    Ok(())
}

pub struct SearchArgs<'a> {
    pub product_type: &'a str,
    pub subtype: &'a str,
    pub theme: Option<&'a str>,
    pub min_price: f64,
    pub max_price: f64,
    pub limit: usize,
    pub json: bool,
}

pub fn search(index: ProductIndex, config: &DesignConfig, args: SearchArgs<'_>) -> Result<()> {
    let theme_domains = match args.theme {
        Some(name) => config
            .theme(&name.trim().to_uppercase())
            .map(|t| t.websites.clone())
            .with_context(|| format!("Unknown theme '{name}'"))?,
        None => Vec::new(),
    };

    let engine = SearchEngine::new(Arc::new(index));
    let outcome = engine.search(&SearchQuery {
        product_type: args.product_type,
        subtype: args.subtype,
        theme_domains: &theme_domains,
        min_price: args.min_price,
        max_price: args.max_price,
        limit: args.limit,
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.matches)?);
        return Ok(());
    }

    match outcome.source {
        CandidateSource::None => {
            println!("No products of type '{}'.", args.product_type);
            return Ok(());
        }
        CandidateSource::TypeFallback => {
            println!("No '{}' products; showing other {}.", args.subtype, args.product_type)
        }
        CandidateSource::Subtype => {}
    }
    if outcome.price_filter == PriceFilter::Widened {
        println!("Nothing in the price range; showing all prices.");
    }

    for (i, m) in outcome.matches.iter().enumerate() {
        let marker = if i < outcome.theme_matches { "*" } else { " " };
        println!("{marker} ${:>9.2}  {}  ({})", m.price, m.name, m.website);
        println!("    {}", m.link);
    }
    Ok(())
}
