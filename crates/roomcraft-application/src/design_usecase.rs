//! Design session use case.
//!
//! `DesignSessionUseCase` drives a session through the design workflow:
//! it loads the session under its lock, consults the catalog and the
//! external collaborators, applies the transition and saves the result.

use crate::session::{SessionLocks, SessionUpdater};
use chrono::{DateTime, Utc};
use roomcraft_core::catalog::{
    CandidateSource, MATCHES_PER_SELECTION, PriceFilter, ProductIndex, ProductMatch, SearchEngine,
    SearchQuery,
};
use roomcraft_core::collaborator::{
    CompositionRequest, CompositionService, DimensionEstimator, check_estimate,
};
use roomcraft_core::config::DesignConfig;
use roomcraft_core::error::{Result, RoomcraftError};
use roomcraft_core::session::{
    FurnitureSelection, PriceRange, RoomDimensions, Session, SessionRepository, SessionSummary,
};
use roomcraft_core::space::SpaceBudget;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Prompt sent to the compositor when the caller leaves it blank.
pub const DEFAULT_GENERATION_PROMPT: &str = "Place furniture naturally in the room";

/// A committed furniture item and the room usage after adding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FurniturePlacement {
    pub selection: FurnitureSelection,
    pub budget: SpaceBudget,
}

/// A removed furniture item and the room usage after removing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FurnitureRemoval {
    pub removed: FurnitureSelection,
    pub budget: SpaceBudget,
}

/// How one furniture selection was matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSearch {
    pub product_type: String,
    pub subtype: String,
    pub found: usize,
    pub theme_matches: usize,
    pub source: CandidateSource,
    pub price_filter: PriceFilter,
}

/// Results of searching every furniture selection of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub price_range: PriceRange,
    /// All matches, in selection order
    pub results: Vec<ProductMatch>,
    pub selections: Vec<SelectionSearch>,
}

/// A generated room image.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub image_url: String,
    pub original_image_url: String,
    pub items: Vec<ProductMatch>,
    pub prompt: String,
    pub elapsed: Duration,
}

/// Use case for running design sessions.
///
/// # Thread Safety
///
/// Operations on the same session are serialized by [`SessionLocks`],
/// including the time spent waiting on the estimator or the compositor.
/// Operations on different sessions run concurrently. The product index is
/// shared read-only.
pub struct DesignSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    updater: SessionUpdater,
    locks: SessionLocks,
    engine: SearchEngine,
    config: Arc<DesignConfig>,
    estimator: Arc<dyn DimensionEstimator>,
    compositor: Arc<dyn CompositionService>,
}

impl DesignSessionUseCase {
    /// Creates a new `DesignSessionUseCase`.
    ///
    /// # Arguments
    ///
    /// * `repository` - Session store
    /// * `index` - Product catalog, built once at startup
    /// * `config` - Room types, themes and space budget settings
    /// * `estimator` - Furniture dimension estimator
    /// * `compositor` - Room image compositor
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        index: Arc<ProductIndex>,
        config: Arc<DesignConfig>,
        estimator: Arc<dyn DimensionEstimator>,
        compositor: Arc<dyn CompositionService>,
    ) -> Self {
        Self {
            updater: SessionUpdater::new(repository.clone()),
            repository,
            locks: SessionLocks::new(),
            engine: SearchEngine::new(index),
            config,
            estimator,
            compositor,
        }
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    pub fn index(&self) -> &ProductIndex {
        self.engine.index()
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Starts a session for an uploaded room photo.
    pub async fn create_session(&self, room_image_url: &str) -> Result<Session> {
        if room_image_url.trim().is_empty() {
            return Err(RoomcraftError::validation("Room image URL must not be empty"));
        }

        let session = Session::new(room_image_url);
        self.repository.save(&session).await?;
        tracing::info!("Created session {}", session.id);
        Ok(session)
    }

    /// Deletes a session.
    pub async fn end_session(&self, session_id: &str) -> Result<()> {
        let guard = self.locks.acquire(session_id).await;
        let result = match self.repository.find_by_id(session_id).await {
            Ok(Some(_)) => self.repository.delete(session_id).await,
            Ok(None) => Err(RoomcraftError::not_found("Session", session_id)),
            Err(err) => Err(err),
        };
        drop(guard);
        self.locks.release_if_idle(session_id).await;

        if result.is_ok() {
            tracing::info!("Ended session {}", session_id);
        }
        result
    }

    /// Deletes every session idle for longer than the configured TTL and
    /// returns their ids. Does nothing when no TTL is configured.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let Some(ttl_secs) = self.config.session_ttl_secs else {
            return Ok(Vec::new());
        };
        let ttl = chrono::Duration::seconds(ttl_secs.min(i64::MAX as u64 / 1000) as i64);

        let mut purged = Vec::new();
        for candidate in self.repository.list_all().await? {
            if !candidate.is_expired(now, ttl) {
                continue;
            }

            let guard = self.locks.acquire(&candidate.id).await;
            let deleted = self.delete_if_expired(&candidate.id, now, ttl).await;
            drop(guard);
            self.locks.release_if_idle(&candidate.id).await;

            if deleted? {
                purged.push(candidate.id);
            }
        }

        if !purged.is_empty() {
            tracing::info!("Purged {} expired session(s)", purged.len());
        }
        Ok(purged)
    }

    /// Re-reads the session under its lock, since it may have been touched
    /// after it was listed.
    async fn delete_if_expired(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Result<bool> {
        let still_expired = self
            .repository
            .find_by_id(session_id)
            .await?
            .is_some_and(|s| s.is_expired(now, ttl));
        if still_expired {
            self.repository.delete(session_id).await?;
        }
        Ok(still_expired)
    }

    // ============================================================================
    // Workflow transitions
    // ============================================================================

    pub async fn set_room_type(&self, session_id: &str, room_type: &str) -> Result<()> {
        self.mutate(session_id, |session, config| {
            session.set_room_type(room_type, config)
        })
        .await?;
        tracing::info!("Session {}: room type set to {}", session_id, room_type);
        Ok(())
    }

    /// Sets the theme and returns its normalized name.
    pub async fn set_theme(&self, session_id: &str, theme: &str) -> Result<String> {
        let theme = self
            .mutate(session_id, |session, config| session.set_theme(theme, config))
            .await?;
        tracing::info!("Session {}: theme set to {}", session_id, theme);
        Ok(theme)
    }

    pub async fn set_dimensions(
        &self,
        session_id: &str,
        length: f64,
        width: f64,
        height: f64,
    ) -> Result<RoomDimensions> {
        let dimensions = self
            .mutate(session_id, |session, config| {
                session.set_dimensions(length, width, height, config.max_room_usage_percent)
            })
            .await?;
        tracing::info!(
            "Session {}: room is {:.1} sqft",
            session_id,
            dimensions.area
        );
        Ok(dimensions)
    }

    /// Estimates the item's footprint and commits it if the room has space.
    pub async fn add_furniture(
        &self,
        session_id: &str,
        product_type: &str,
        subtype: &str,
    ) -> Result<FurniturePlacement> {
        let guard = self.locks.acquire(session_id).await;
        let result = self.add_furniture_locked(session_id, product_type, subtype).await;
        self.finish(session_id, guard, &result).await;
        result
    }

    async fn add_furniture_locked(
        &self,
        session_id: &str,
        product_type: &str,
        subtype: &str,
    ) -> Result<FurniturePlacement> {
        let mut session = self.updater.load(session_id).await?;
        let room_area = session.require_area("add furniture")?;

        let index = self.engine.index();
        if !index.has_type(product_type) {
            return Err(RoomcraftError::not_found_with_suggestions(
                "Furniture type",
                product_type,
                index.similar_types(product_type),
            ));
        }

        let estimate = self
            .estimator
            .estimate(product_type, subtype, room_area)
            .await?;
        let dimensions = check_estimate(estimate, &self.config.estimate_bounds)?;

        let selection = FurnitureSelection::new(product_type, subtype, dimensions);
        let budget = match session.add_furniture(selection.clone(), self.config.max_room_usage_percent)
        {
            Ok(budget) => budget,
            Err(err) => {
                tracing::warn!("Session {}: rejected {} ({})", session_id, subtype, err);
                return Err(err);
            }
        };
        self.updater.save(&session).await?;

        tracing::info!(
            "Session {}: added {} ({:.1} sqft), usage {:.1}%",
            session_id,
            subtype,
            selection.area,
            budget.usage_percent
        );
        Ok(FurniturePlacement { selection, budget })
    }

    pub async fn remove_furniture(&self, session_id: &str, index: usize) -> Result<FurnitureRemoval> {
        let (removed, budget) = self
            .mutate(session_id, |session, config| {
                session.remove_furniture(index, config.max_room_usage_percent)
            })
            .await?;
        tracing::info!(
            "Session {}: removed {}, usage {:.1}%",
            session_id,
            removed.subtype,
            budget.usage_percent
        );
        Ok(FurnitureRemoval { removed, budget })
    }

    pub async fn set_price_range(&self, session_id: &str, min: f64, max: f64) -> Result<PriceRange> {
        let range = self
            .mutate(session_id, |session, _| session.set_price_range(min, max))
            .await?;
        tracing::info!(
            "Session {}: price range ${:.0}-${:.0}",
            session_id,
            range.min,
            range.max
        );
        Ok(range)
    }

    /// Searches the catalog for every furniture selection and stores the
    /// concatenated results, replacing earlier ones.
    pub async fn search(&self, session_id: &str) -> Result<SearchReport> {
        let engine = &self.engine;
        let report = self
            .mutate(session_id, |session, _| {
                let price_range = session.require_search_ready()?;

                let mut results = Vec::new();
                let mut selections = Vec::with_capacity(session.furniture_selections.len());
                for selection in &session.furniture_selections {
                    let outcome = engine.search(&SearchQuery {
                        product_type: &selection.product_type,
                        subtype: &selection.subtype,
                        theme_domains: &session.theme_websites,
                        min_price: price_range.min,
                        max_price: price_range.max,
                        limit: MATCHES_PER_SELECTION,
                    });

                    selections.push(SelectionSearch {
                        product_type: selection.product_type.clone(),
                        subtype: selection.subtype.clone(),
                        found: outcome.matches.len(),
                        theme_matches: outcome.theme_matches,
                        source: outcome.source,
                        price_filter: outcome.price_filter,
                    });
                    results.extend(outcome.matches);
                }

                session.record_search_results(results.clone());
                Ok(SearchReport {
                    price_range,
                    results,
                    selections,
                })
            })
            .await?;

        tracing::info!(
            "Session {}: {} products found",
            session_id,
            report.results.len()
        );
        Ok(report)
    }

    /// Renders the chosen products into the room photo.
    ///
    /// `links` picks from the stored search results. A blank `prompt` falls
    /// back to [`DEFAULT_GENERATION_PROMPT`].
    pub async fn generate(
        &self,
        session_id: &str,
        links: &[String],
        prompt: Option<&str>,
    ) -> Result<GenerationOutcome> {
        let guard = self.locks.acquire(session_id).await;
        let result = self.generate_locked(session_id, links, prompt).await;
        self.finish(session_id, guard, &result).await;
        result
    }

    async fn generate_locked(
        &self,
        session_id: &str,
        links: &[String],
        prompt: Option<&str>,
    ) -> Result<GenerationOutcome> {
        let mut session = self.updater.load(session_id).await?;
        let items = session.select_for_generation(links)?;

        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_GENERATION_PROMPT)
            .to_string();

        let request = CompositionRequest {
            room_image_url: session.room_image_url.clone(),
            items,
            prompt,
            room_type: session.require_room_type("generate")?.to_string(),
            theme: session.require_theme("generate")?.to_string(),
        };

        tracing::info!(
            "Session {}: generating with {} item(s)",
            session_id,
            request.items.len()
        );
        let started = Instant::now();
        let image_url = self.compositor.compose(&request).await?;
        let elapsed = started.elapsed();

        session.record_generated_image(image_url.clone());
        self.updater.save(&session).await?;

        tracing::info!(
            "Session {}: generated {} in {:.1}s",
            session_id,
            image_url,
            elapsed.as_secs_f64()
        );
        Ok(GenerationOutcome {
            image_url,
            original_image_url: request.room_image_url,
            items: request.items,
            prompt: request.prompt,
            elapsed,
        })
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.updater.load(session_id).await
    }

    pub async fn session_summary(&self, session_id: &str) -> Result<SessionSummary> {
        Ok(self.updater.load(session_id).await?.summary())
    }

    pub async fn generation_history(&self, session_id: &str) -> Result<Vec<String>> {
        Ok(self.updater.load(session_id).await?.generated_images)
    }

    pub fn room_types(&self) -> &[String] {
        &self.config.room_types
    }

    pub fn themes(&self) -> Vec<String> {
        self.config.theme_names()
    }

    /// Furniture types and subtypes sold by the session theme's retailers.
    pub async fn theme_catalog(&self, session_id: &str) -> Result<BTreeMap<String, BTreeSet<String>>> {
        let session = self.updater.load(session_id).await?;
        session.require_theme("browse theme catalog")?;
        Ok(self.index().theme_catalog(&session.theme_websites))
    }

    /// Subtypes of `product_type` sold by the session theme's retailers.
    pub async fn theme_subtypes(
        &self,
        session_id: &str,
        product_type: &str,
    ) -> Result<BTreeSet<String>> {
        let session = self.updater.load(session_id).await?;
        session.require_theme("browse theme subtypes")?;

        let subtypes = self
            .index()
            .theme_subtypes(&session.theme_websites, product_type);
        if subtypes.is_empty() {
            let offered = self
                .index()
                .theme_catalog(&session.theme_websites)
                .into_keys()
                .filter(|t| t.to_lowercase().contains(&product_type.to_lowercase()))
                .collect();
            return Err(RoomcraftError::not_found_with_suggestions(
                "Furniture type",
                product_type,
                offered,
            ));
        }
        Ok(subtypes)
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    /// Runs a synchronous transition under the session lock.
    async fn mutate<T, F>(&self, session_id: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut Session, &DesignConfig) -> Result<T>,
    {
        let guard = self.locks.acquire(session_id).await;
        let config: &DesignConfig = &self.config;
        let result = self
            .updater
            .update(session_id, |session| op(session, config))
            .await;
        self.finish(session_id, guard, &result).await;
        result
    }

    /// Releases the lock, dropping its entry when the session turned out not
    /// to exist.
    async fn finish<T>(
        &self,
        session_id: &str,
        guard: tokio::sync::OwnedMutexGuard<()>,
        result: &Result<T>,
    ) {
        drop(guard);
        if let Err(RoomcraftError::NotFound {
            entity_type: "Session",
            ..
        }) = result
        {
            self.locks.release_if_idle(session_id).await;
        }
    }
}
