//! Workflow transitions on [`Session`].
//!
//! Every method validates its prerequisites against the populated fields and
//! fails with [`RoomcraftError::Precondition`] naming the first missing one.
//! Nothing is written unless the whole transition succeeds. After each
//! successful write `stage` is recomputed from the data.

use super::model::{
    FurnitureSelection, PriceRange, RoomDimensions, Session, SessionSummary, Stage,
};
use crate::catalog::ProductMatch;
use crate::config::DesignConfig;
use crate::error::{Result, RoomcraftError};
use crate::space::{self, SpaceBudget};
use chrono::{DateTime, Utc};

impl Session {
    /// Starts a session for an uploaded room photo.
    pub fn new(room_image_url: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            room_image_url: room_image_url.into(),
            stage: Stage::Created,
            room_type: None,
            theme: None,
            theme_websites: Vec::new(),
            dimensions: None,
            furniture_selections: Vec::new(),
            total_area_used: 0.0,
            price_range: None,
            search_results: Vec::new(),
            generated_images: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    // ============================================================================
    // Prerequisite accessors
    // ============================================================================

    pub fn require_room_type(&self, operation: &'static str) -> Result<&str> {
        self.room_type
            .as_deref()
            .ok_or_else(|| RoomcraftError::precondition(operation, "room type"))
    }

    pub fn require_theme(&self, operation: &'static str) -> Result<&str> {
        self.theme
            .as_deref()
            .ok_or_else(|| RoomcraftError::precondition(operation, "theme"))
    }

    pub fn require_dimensions(&self, operation: &'static str) -> Result<RoomDimensions> {
        self.dimensions
            .ok_or_else(|| RoomcraftError::precondition(operation, "room dimensions"))
    }

    /// Floor area of the room; needed before any furniture can be placed.
    pub fn require_area(&self, operation: &'static str) -> Result<f64> {
        self.require_dimensions(operation).map(|d| d.area)
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Sets the room type. Must be one of the configured room types.
    pub fn set_room_type(&mut self, room_type: &str, config: &DesignConfig) -> Result<()> {
        if !config.is_room_type(room_type) {
            return Err(RoomcraftError::validation(format!(
                "Invalid room type '{}'. Choose from: {}",
                room_type,
                config.room_types.join(", ")
            )));
        }

        self.room_type = Some(room_type.to_string());
        self.touch();
        Ok(())
    }

    /// Sets the theme (case-insensitive) and its preferred retailers.
    ///
    /// Returns the normalized theme name.
    pub fn set_theme(&mut self, theme: &str, config: &DesignConfig) -> Result<String> {
        self.require_room_type("set theme")?;

        let normalized = theme.trim().to_uppercase();
        let websites = config
            .theme(&normalized)
            .map(|t| t.websites.clone())
            .ok_or_else(|| {
                RoomcraftError::validation(format!(
                    "Invalid theme '{}'. Choose from: {}",
                    theme,
                    config.theme_names().join(", ")
                ))
            })?;

        self.theme = Some(normalized.clone());
        self.theme_websites = websites;
        self.touch();
        Ok(normalized)
    }

    /// Sets the room measurements.
    ///
    /// Furniture already placed is re-checked against the new floor area; if
    /// it would exceed the cap the dimensions are not changed.
    pub fn set_dimensions(
        &mut self,
        length: f64,
        width: f64,
        height: f64,
        max_usage_percent: f64,
    ) -> Result<RoomDimensions> {
        self.require_room_type("set dimensions")?;
        self.require_theme("set dimensions")?;

        for (name, value) in [("length", length), ("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RoomcraftError::validation(format!(
                    "Room {name} must be greater than 0 (got {value})"
                )));
            }
        }

        let dimensions = RoomDimensions::new(length, width, height);
        if !dimensions.area.is_finite() || !dimensions.volume.is_finite() {
            return Err(RoomcraftError::validation(format!(
                "Room dimensions {length} x {width} x {height} are too large"
            )));
        }
        if !self.furniture_selections.is_empty() {
            space::validate(self.total_area_used, 0.0, dimensions.area, max_usage_percent)
                .ensure_fits()?;
        }

        self.dimensions = Some(dimensions);
        self.touch();
        Ok(dimensions)
    }

    /// Appends a furniture item if the cumulative area stays within the cap.
    ///
    /// On a failed budget check the selection list is left untouched.
    pub fn add_furniture(
        &mut self,
        selection: FurnitureSelection,
        max_usage_percent: f64,
    ) -> Result<SpaceBudget> {
        let room_area = self.require_area("add furniture")?;
        let budget = space::validate(
            self.total_area_used,
            selection.area,
            room_area,
            max_usage_percent,
        )
        .ensure_fits()?;

        self.furniture_selections.push(selection);
        self.recompute_total_area();
        self.touch();
        Ok(budget)
    }

    /// Removes the furniture item at `index` and reports the new usage.
    ///
    /// Removing the last item also drops the stored search results.
    pub fn remove_furniture(
        &mut self,
        index: usize,
        max_usage_percent: f64,
    ) -> Result<(FurnitureSelection, SpaceBudget)> {
        let count = self.furniture_selections.len();
        if index >= count {
            let range = if count == 0 {
                "no furniture selected".to_string()
            } else {
                format!("valid range: 0-{}", count - 1)
            };
            return Err(RoomcraftError::validation(format!(
                "Invalid furniture index {index} ({range})"
            )));
        }

        let room_area = self.require_area("remove furniture")?;
        let removed = self.furniture_selections.remove(index);
        self.recompute_total_area();
        if self.furniture_selections.is_empty() {
            self.search_results.clear();
        }
        self.touch();

        let budget = space::validate(self.total_area_used, 0.0, room_area, max_usage_percent);
        Ok((removed, budget))
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) -> Result<PriceRange> {
        if !min.is_finite() || !max.is_finite() {
            return Err(RoomcraftError::validation("Prices must be finite numbers"));
        }
        if min < 0.0 {
            return Err(RoomcraftError::validation(format!(
                "min_price cannot be negative (got {min})"
            )));
        }
        if max <= 0.0 {
            return Err(RoomcraftError::validation(format!(
                "max_price must be greater than 0 (got {max})"
            )));
        }
        if min > max {
            return Err(RoomcraftError::validation(format!(
                "min_price ({min}) cannot be greater than max_price ({max})"
            )));
        }

        let range = PriceRange { min, max };
        self.price_range = Some(range);
        self.touch();
        Ok(range)
    }

    /// Checks that the session can be searched and returns its price range.
    pub fn require_search_ready(&self) -> Result<PriceRange> {
        if self.furniture_selections.is_empty() {
            return Err(RoomcraftError::precondition("search", "furniture selection"));
        }
        self.price_range
            .ok_or_else(|| RoomcraftError::precondition("search", "price range"))
    }

    /// Replaces the stored search results.
    pub fn record_search_results(&mut self, results: Vec<ProductMatch>) {
        self.search_results = results;
        self.touch();
    }

    /// Picks the search results whose link is in `links`, in result order.
    pub fn select_for_generation<S: AsRef<str>>(&self, links: &[S]) -> Result<Vec<ProductMatch>> {
        if self.search_results.is_empty() {
            return Err(RoomcraftError::precondition("generate", "search results"));
        }

        let selected: Vec<ProductMatch> = self
            .search_results
            .iter()
            .filter(|item| links.iter().any(|link| link.as_ref() == item.link))
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(RoomcraftError::validation(
                "No valid furniture selected: none of the links match the search results",
            ));
        }
        Ok(selected)
    }

    pub fn record_generated_image(&mut self, url: String) {
        self.generated_images.push(url);
        self.touch();
    }

    // ============================================================================
    // Derived values
    // ============================================================================

    /// Share of the floor area occupied by selected furniture, or 0 before
    /// dimensions are known.
    pub fn usage_percent(&self) -> f64 {
        match self.dimensions {
            Some(d) if d.area > 0.0 => self.total_area_used / d.area * 100.0,
            _ => 0.0,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from(self)
    }

    /// Whether the session has been idle for longer than `ttl`.
    ///
    /// Sessions with an unparsable timestamp count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        match DateTime::parse_from_rfc3339(&self.updated_at) {
            Ok(updated) => now.signed_duration_since(updated.with_timezone(&Utc)) > ttl,
            Err(_) => true,
        }
    }

    /// The furthest step whose prerequisites are all populated.
    pub fn derive_stage(&self) -> Stage {
        let search_ready = !self.furniture_selections.is_empty() && self.price_range.is_some();
        let searched = search_ready && !self.search_results.is_empty();

        if searched && !self.generated_images.is_empty() {
            Stage::Generated
        } else if searched {
            Stage::Searched
        } else if search_ready {
            Stage::PriceRangeSet
        } else if !self.furniture_selections.is_empty() {
            Stage::FurnitureSelecting
        } else if self.dimensions.is_some() {
            Stage::DimensionsSet
        } else if self.theme.is_some() {
            Stage::ThemeSet
        } else if self.room_type.is_some() {
            Stage::RoomTypeSet
        } else {
            Stage::Created
        }
    }

    fn recompute_total_area(&mut self) {
        self.total_area_used = self.furniture_selections.iter().map(|s| s.area).sum();
    }

    fn touch(&mut self) {
        self.stage = self.derive_stage();
        self.updated_at = Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FurnitureDimensions;
    use proptest::prelude::*;

    const CAP: f64 = 60.0;

    fn item(area: f64) -> FurnitureSelection {
        FurnitureSelection::new(
            "Sofas",
            "3-seater sofa",
            FurnitureDimensions {
                width: area / 2.0,
                depth: 2.0,
                height: 3.0,
                area,
            },
        )
    }

    fn session_with_room(length: f64, width: f64) -> Session {
        let config = DesignConfig::default();
        let mut session = Session::new("https://cdn.example.com/rooms/1.jpg");
        session.set_room_type("Living Room Furniture", &config).unwrap();
        session.set_theme("modern living", &config).unwrap();
        session.set_dimensions(length, width, 9.0, CAP).unwrap();
        session
    }

    #[test]
    fn new_session_starts_created() {
        let session = Session::new("https://cdn.example.com/rooms/1.jpg");
        assert_eq!(session.stage, Stage::Created);
        assert!(uuid::Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.total_area_used, 0.0);
    }

    #[test]
    fn theme_requires_room_type() {
        let config = DesignConfig::default();
        let mut session = Session::new("img");

        let err = session.set_theme("MODERN LIVING", &config).unwrap_err();
        assert_eq!(
            err,
            RoomcraftError::Precondition {
                operation: "set theme",
                missing: "room type"
            }
        );
        assert!(session.theme.is_none());
    }

    #[test]
    fn room_type_can_be_reset_before_theme() {
        let config = DesignConfig::default();
        let mut session = Session::new("img");
        session.set_room_type("Kitchen", &config).unwrap();
        session.set_room_type("Study Room", &config).unwrap();

        assert_eq!(session.room_type.as_deref(), Some("Study Room"));
        assert_eq!(session.stage, Stage::RoomTypeSet);
    }

    #[test]
    fn unknown_room_type_is_rejected() {
        let config = DesignConfig::default();
        let mut session = Session::new("img");
        let err = session.set_room_type("Garage", &config).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Kitchen"));
    }

    #[test]
    fn theme_is_case_normalized_and_sets_websites() {
        let config = DesignConfig::default();
        let mut session = Session::new("img");
        session.set_room_type("Kitchen", &config).unwrap();

        let theme = session.set_theme("boho eclectic", &config).unwrap();
        assert_eq!(theme, "BOHO ECLECTIC");
        assert_eq!(session.theme_websites.first().map(String::as_str), Some("sklum.com"));
        assert_eq!(session.stage, Stage::ThemeSet);

        assert!(session.set_theme("gothic", &config).unwrap_err().is_validation());
        assert_eq!(session.theme.as_deref(), Some("BOHO ECLECTIC"));
    }

    #[test]
    fn dimensions_require_theme_and_positive_values() {
        let config = DesignConfig::default();
        let mut session = Session::new("img");
        session.set_room_type("Kitchen", &config).unwrap();

        let err = session.set_dimensions(10.0, 10.0, 8.0, CAP).unwrap_err();
        assert!(err.is_precondition());

        session.set_theme("MODERN LIVING", &config).unwrap();
        assert!(session.set_dimensions(0.0, 10.0, 8.0, CAP).unwrap_err().is_validation());
        assert!(session.set_dimensions(10.0, -1.0, 8.0, CAP).unwrap_err().is_validation());

        let dims = session.set_dimensions(12.0, 10.0, 8.0, CAP).unwrap();
        assert_eq!(dims.area, 120.0);
        assert_eq!(dims.volume, 960.0);
        assert_eq!(session.stage, Stage::DimensionsSet);
    }

    #[test]
    fn shrinking_room_below_committed_furniture_is_rejected() {
        let mut session = session_with_room(20.0, 20.0);
        session.add_furniture(item(100.0), CAP).unwrap();

        let err = session.set_dimensions(10.0, 10.0, 9.0, CAP).unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(session.dimensions.map(|d| d.area), Some(400.0));
    }

    #[test]
    fn furniture_requires_dimensions() {
        let mut session = Session::new("img");
        let err = session.add_furniture(item(10.0), CAP).unwrap_err();
        assert_eq!(
            err,
            RoomcraftError::precondition("add furniture", "room dimensions")
        );
    }

    #[test]
    fn over_budget_item_is_not_committed() {
        let mut session = session_with_room(20.0, 20.0);

        let budget = session.add_furniture(item(100.0), CAP).unwrap();
        assert_eq!(budget.usage_percent, 25.0);
        assert_eq!(session.stage, Stage::FurnitureSelecting);

        let err = session.add_furniture(item(200.0), CAP).unwrap_err();
        match err {
            RoomcraftError::Capacity {
                usage_percent,
                max_usage_percent,
                ..
            } => {
                assert_eq!(usage_percent, 75.0);
                assert_eq!(max_usage_percent, CAP);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.furniture_selections.len(), 1);
        assert_eq!(session.total_area_used, 100.0);
    }

    #[test]
    fn remove_recomputes_total_and_validates_index() {
        let mut session = session_with_room(20.0, 20.0);
        session.add_furniture(item(40.0), CAP).unwrap();
        session.add_furniture(item(60.0), CAP).unwrap();

        let err = session.remove_furniture(2, CAP).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("0-1"));

        let (removed, budget) = session.remove_furniture(0, CAP).unwrap();
        assert_eq!(removed.area, 40.0);
        assert_eq!(session.total_area_used, 60.0);
        assert_eq!(budget.usage_percent, 15.0);
        assert!(budget.fits);
    }

    #[test]
    fn price_range_must_be_ordered() {
        let mut session = Session::new("img");
        assert!(session.set_price_range(300.0, 200.0).unwrap_err().is_validation());
        assert!(session.set_price_range(-1.0, 200.0).unwrap_err().is_validation());
        assert!(session.set_price_range(0.0, 0.0).unwrap_err().is_validation());
        assert_eq!(
            session.set_price_range(200.0, 200.0).unwrap(),
            PriceRange {
                min: 200.0,
                max: 200.0
            }
        );
    }

    #[test]
    fn search_needs_furniture_then_price_range() {
        let mut session = session_with_room(20.0, 20.0);
        assert_eq!(
            session.require_search_ready().unwrap_err(),
            RoomcraftError::precondition("search", "furniture selection")
        );

        session.add_furniture(item(10.0), CAP).unwrap();
        assert_eq!(
            session.require_search_ready().unwrap_err(),
            RoomcraftError::precondition("search", "price range")
        );

        session.set_price_range(100.0, 200.0).unwrap();
        assert_eq!(session.stage, Stage::PriceRangeSet);
        assert!(session.require_search_ready().is_ok());
    }

    #[test]
    fn generation_filters_results_by_link() {
        let mut session = session_with_room(20.0, 20.0);
        assert!(session.select_for_generation(&["x"]).unwrap_err().is_precondition());
        session.add_furniture(item(10.0), CAP).unwrap();
        session.set_price_range(100.0, 200.0).unwrap();

        let hit = |link: &str| ProductMatch {
            name: link.to_string(),
            link: link.to_string(),
            price: 150.0,
            image_url: String::new(),
            website: "heals.com".to_string(),
            product_type: "Sofas".to_string(),
            subtype: "3-seater sofa".to_string(),
        };
        session.record_search_results(vec![hit("a"), hit("b"), hit("c")]);
        assert_eq!(session.stage, Stage::Searched);

        let chosen = session.select_for_generation(&["c", "a", "zzz"]).unwrap();
        let links: Vec<&str> = chosen.iter().map(|m| m.link.as_str()).collect();
        assert_eq!(links, vec!["a", "c"]);

        assert!(session.select_for_generation(&["zzz"]).unwrap_err().is_validation());

        session.record_generated_image("https://cdn.example.com/out/1.png".to_string());
        session.record_generated_image("https://cdn.example.com/out/2.png".to_string());
        assert_eq!(session.stage, Stage::Generated);
        assert_eq!(session.generated_images.len(), 2);
    }

    #[test]
    fn removing_last_item_after_search_rolls_stage_back() {
        let mut session = session_with_room(20.0, 20.0);
        session.add_furniture(item(10.0), CAP).unwrap();
        session.set_price_range(100.0, 200.0).unwrap();
        session.record_search_results(vec![ProductMatch {
            name: "Oslo".to_string(),
            link: "https://kavehome.com/p/oslo".to_string(),
            price: 150.0,
            image_url: String::new(),
            website: "kavehome.com".to_string(),
            product_type: "Sofas".to_string(),
            subtype: "3-seater sofa".to_string(),
        }]);
        session.record_generated_image("https://cdn.example.com/out/1.png".to_string());
        assert_eq!(session.stage, Stage::Generated);

        session.remove_furniture(0, CAP).unwrap();
        assert!(session.furniture_selections.is_empty());
        assert!(session.search_results.is_empty());
        assert_eq!(session.stage, Stage::DimensionsSet);
        assert_eq!(
            session
                .select_for_generation(&["https://kavehome.com/p/oslo"])
                .unwrap_err(),
            RoomcraftError::precondition("generate", "search results")
        );
        assert_eq!(session.generated_images.len(), 1);
    }

    #[test]
    fn stage_needs_selections_and_price_range_to_count_as_searched() {
        let mut session = session_with_room(20.0, 20.0);
        session.record_search_results(vec![ProductMatch {
            name: "stray".to_string(),
            link: "stray".to_string(),
            price: 1.0,
            image_url: String::new(),
            website: String::new(),
            product_type: "Sofas".to_string(),
            subtype: "3-seater sofa".to_string(),
        }]);
        assert_eq!(session.derive_stage(), Stage::DimensionsSet);
    }

    #[test]
    fn overflowing_room_measurements_are_rejected() {
        let mut session = session_with_room(20.0, 20.0);

        let err = session.set_dimensions(1e200, 1e200, 1e200, CAP).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.dimensions.map(|d| d.area), Some(400.0));

        // Finite area, overflowing volume.
        assert!(session.set_dimensions(1e150, 1e150, 1e100, CAP).unwrap_err().is_validation());

        let err = session.add_furniture(item(1e300), CAP).unwrap_err();
        assert!(err.is_capacity());
    }

    #[test]
    fn expiry_compares_last_update_with_ttl() {
        let session = Session::new("img");
        let now = Utc::now();
        assert!(!session.is_expired(now, chrono::Duration::hours(1)));
        assert!(session.is_expired(now + chrono::Duration::hours(2), chrono::Duration::hours(1)));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(f64),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1.0f64..80.0).prop_map(Op::Add),
            (0usize..8).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn total_area_always_matches_selections(ops in proptest::collection::vec(op(), 0..40)) {
            let mut session = session_with_room(20.0, 20.0);
            for op in ops {
                let _ = match op {
                    Op::Add(area) => session.add_furniture(item(area), CAP).map(|_| ()),
                    Op::Remove(index) => session.remove_furniture(index, CAP).map(|_| ()),
                };
                let expected: f64 = session.furniture_selections.iter().map(|s| s.area).sum();
                prop_assert_eq!(session.total_area_used, expected);
                prop_assert!(session.usage_percent() <= CAP + 1e-9);
            }
        }
    }
}
