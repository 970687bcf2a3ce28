//! Floor-area budget checks.
//!
//! All areas are in square feet. The validator is a pure function; callers
//! decide whether a failed check becomes a [`RoomcraftError::Capacity`].

use crate::error::RoomcraftError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of checking a prospective total against the room's usage cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceBudget {
    pub fits: bool,
    pub usage_percent: f64,
    pub total_area: f64,
    pub remaining_area: f64,
    pub max_usage_percent: f64,
    pub room_area: f64,
}

impl SpaceBudget {
    /// Percentage points above the cap; zero when the budget fits.
    pub fn overshoot_percent(&self) -> f64 {
        (self.usage_percent - self.max_usage_percent).max(0.0)
    }

    /// Converts a failed check into the error surfaced to callers.
    pub fn into_capacity_error(self) -> RoomcraftError {
        RoomcraftError::Capacity {
            usage_percent: self.usage_percent,
            max_usage_percent: self.max_usage_percent,
            total_area: self.total_area,
            room_area: self.room_area,
        }
    }

    /// Returns `self` when it fits, the capacity error otherwise.
    pub fn ensure_fits(self) -> Result<Self, RoomcraftError> {
        if self.fits {
            Ok(self)
        } else {
            Err(self.into_capacity_error())
        }
    }
}

impl fmt::Display for SpaceBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fits {
            write!(
                f,
                "Furniture fits. Room usage: {:.1}% ({:.1} sqft remaining)",
                self.usage_percent, self.remaining_area
            )
        } else {
            write!(
                f,
                "Room too crowded. Usage would be {:.1}% (exceeds {:.1}% by {:.1}%)",
                self.usage_percent,
                self.max_usage_percent,
                self.overshoot_percent()
            )
        }
    }
}

/// Checks whether `current_total_area + new_item_area` stays within
/// `max_usage_percent` of `room_area`.
///
/// A room with no positive area never fits. Pass `new_item_area = 0` to
/// report on an already-committed total.
pub fn validate(
    current_total_area: f64,
    new_item_area: f64,
    room_area: f64,
    max_usage_percent: f64,
) -> SpaceBudget {
    let total_area = current_total_area + new_item_area;
    let usage_percent = if room_area > 0.0 {
        total_area / room_area * 100.0
    } else {
        f64::INFINITY
    };

    SpaceBudget {
        fits: usage_percent <= max_usage_percent,
        usage_percent,
        total_area,
        remaining_area: room_area - total_area,
        max_usage_percent,
        room_area,
    }
}
