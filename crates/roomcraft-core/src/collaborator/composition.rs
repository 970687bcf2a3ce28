//! Image composition contract.

use crate::catalog::ProductMatch;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the compositor needs to render furniture into a room photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRequest {
    pub room_image_url: String,
    pub items: Vec<ProductMatch>,
    pub prompt: String,
    pub room_type: String,
    pub theme: String,
}

/// Renders selected products into the user's room image.
///
/// A single opaque call: the workflow never retries it. Failures are
/// reported as [`RoomcraftError::Upstream`](crate::error::RoomcraftError::Upstream).
#[async_trait]
pub trait CompositionService: Send + Sync {
    /// Returns the public URL of the generated image.
    async fn compose(&self, request: &CompositionRequest) -> Result<String>;
}
