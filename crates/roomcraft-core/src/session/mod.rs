//! Session domain module.
//!
//! This module contains the design session record, the workflow transitions
//! that mutate it, and the repository interface that stores it.
//!
//! # Module Structure
//!
//! - `model`: `Session` and the value types it holds
//! - `machine`: step-ordering rules, implemented as methods on `Session`
//! - `repository`: repository trait for session storage

mod machine;
mod model;
mod repository;

// Re-export public API
pub use model::{
    FurnitureDimensions, FurnitureSelection, PriceRange, RoomDimensions, Session, SessionSummary,
    Stage,
};
pub use repository::SessionRepository;
