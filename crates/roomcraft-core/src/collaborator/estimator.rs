//! Dimension estimator contract.

use crate::config::EstimateBounds;
use crate::error::{Result, RoomcraftError};
use crate::session::FurnitureDimensions;
use async_trait::async_trait;

/// Estimates the footprint of a piece of furniture.
///
/// Implementations report missing or malformed responses as
/// [`RoomcraftError::Estimation`]. Whatever they return is passed through
/// [`check_estimate`] before it reaches a session.
#[async_trait]
pub trait DimensionEstimator: Send + Sync {
    /// Returns dimensions in feet and floor area in square feet.
    ///
    /// # Arguments
    ///
    /// * `product_type` - Furniture type, e.g. `Sofas`
    /// * `subtype` - Variant within the type, e.g. `3-seater sofa`
    /// * `room_area` - Floor area of the room, so the estimate can be proportional
    async fn estimate(
        &self,
        product_type: &str,
        subtype: &str,
        room_area: f64,
    ) -> Result<FurnitureDimensions>;
}

/// Rejects estimates outside the configured sanity bounds.
pub fn check_estimate(dimensions: FurnitureDimensions, bounds: &EstimateBounds) -> Result<FurnitureDimensions> {
    check_axis("width", dimensions.width, bounds.max_width)?;
    check_axis("depth", dimensions.depth, bounds.max_depth)?;
    check_axis("height", dimensions.height, bounds.max_height)?;

    if !dimensions.area.is_finite() || dimensions.area <= 0.0 {
        return Err(RoomcraftError::estimation(format!(
            "Unrealistic floor area: {} sqft",
            dimensions.area
        )));
    }

    Ok(dimensions)
}

fn check_axis(axis: &str, value: f64, max: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(RoomcraftError::estimation(format!(
            "Unrealistic {axis}: {value} feet (expected above 0 and at most {max})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: f64, depth: f64, height: f64) -> FurnitureDimensions {
        FurnitureDimensions {
            width,
            depth,
            height,
            area: width * depth,
        }
    }

    #[test]
    fn accepts_estimate_within_bounds() {
        let bounds = EstimateBounds::default();
        let sofa = dims(7.0, 3.2, 3.0);
        assert_eq!(check_estimate(sofa, &bounds), Ok(sofa));
        assert!(check_estimate(dims(20.0, 20.0, 10.0), &bounds).is_ok());
    }

    #[test]
    fn rejects_each_axis_out_of_range() {
        let bounds = EstimateBounds::default();
        for bad in [
            dims(0.0, 2.0, 2.0),
            dims(21.0, 2.0, 2.0),
            dims(2.0, -1.0, 2.0),
            dims(2.0, 20.5, 2.0),
            dims(2.0, 2.0, 0.0),
            dims(2.0, 2.0, 10.1),
            dims(f64::NAN, 2.0, 2.0),
        ] {
            let err = check_estimate(bad, &bounds).unwrap_err();
            assert!(err.is_estimation(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn rejects_non_positive_area() {
        let mut item = dims(2.0, 2.0, 2.0);
        item.area = 0.0;
        assert!(check_estimate(item, &EstimateBounds::default()).is_err());
    }
}
