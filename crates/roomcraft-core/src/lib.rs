//! Domain layer for Roomcraft.
//!
//! Holds the design-session state machine, the product index and search
//! engine, the floor-area budget validator, and the traits through which the
//! workflow reaches storage and external AI services.

pub mod catalog;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod session;
pub mod space;

// Re-export common error type
pub use error::{Result, RoomcraftError};
