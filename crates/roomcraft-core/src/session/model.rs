//! Session domain model.
//!
//! This module contains the `Session` record that accumulates a user's
//! choices as they move through the design workflow, and the value types
//! stored inside it.

use crate::catalog::ProductMatch;
use serde::{Deserialize, Serialize};

/// Position of a session in the design workflow.
///
/// Ordered: a later variant means every earlier step is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Created,
    RoomTypeSet,
    ThemeSet,
    DimensionsSet,
    FurnitureSelecting,
    PriceRangeSet,
    Searched,
    Generated,
}

/// Room measurements in feet, with derived floor area and volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Floor area in square feet (`length * width`)
    pub area: f64,
    /// Volume in cubic feet (`length * width * height`)
    pub volume: f64,
}

impl RoomDimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            area: length * width,
            volume: length * width * height,
        }
    }
}

/// Footprint of a piece of furniture, in feet and square feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FurnitureDimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub area: f64,
}

/// A furniture item the user committed to the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureSelection {
    #[serde(rename = "type")]
    pub product_type: String,
    pub subtype: String,
    pub dimensions: FurnitureDimensions,
    /// Floor area counted against the room budget
    pub area: f64,
}

impl FurnitureSelection {
    pub fn new(
        product_type: impl Into<String>,
        subtype: impl Into<String>,
        dimensions: FurnitureDimensions,
    ) -> Self {
        Self {
            product_type: product_type.into(),
            subtype: subtype.into(),
            area: dimensions.area,
            dimensions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// A design session.
///
/// Fields are public for reading; every change goes through the transition
/// methods so `stage` and `total_area_used` stay consistent with the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Public URL of the uploaded room photo
    pub room_image_url: String,
    pub stage: Stage,
    pub room_type: Option<String>,
    /// Upper-case theme name
    pub theme: Option<String>,
    /// Retailer domains preferred by the theme, in priority order
    #[serde(default)]
    pub theme_websites: Vec<String>,
    pub dimensions: Option<RoomDimensions>,
    #[serde(default)]
    pub furniture_selections: Vec<FurnitureSelection>,
    /// Sum of `area` over `furniture_selections`
    #[serde(default)]
    pub total_area_used: f64,
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub search_results: Vec<ProductMatch>,
    #[serde(default)]
    pub generated_images: Vec<String>,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
    /// Timestamp of the last mutation (RFC 3339)
    pub updated_at: String,
}

/// Read-only overview of a session's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub room_image_url: String,
    pub stage: Stage,
    pub room_type: Option<String>,
    pub theme: Option<String>,
    pub theme_websites: Vec<String>,
    pub dimensions: Option<RoomDimensions>,
    pub furniture_count: usize,
    pub total_area_used: f64,
    pub usage_percent: f64,
    pub price_range: Option<PriceRange>,
    pub search_results_count: usize,
    pub generated_images_count: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            room_image_url: session.room_image_url.clone(),
            stage: session.stage,
            room_type: session.room_type.clone(),
            theme: session.theme.clone(),
            theme_websites: session.theme_websites.clone(),
            dimensions: session.dimensions,
            furniture_count: session.furniture_selections.len(),
            total_area_used: session.total_area_used,
            usage_percent: session.usage_percent(),
            price_range: session.price_range,
            search_results_count: session.search_results.len(),
            generated_images_count: session.generated_images.len(),
        }
    }
}
