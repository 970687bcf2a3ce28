//! Contracts for the external services the workflow consumes.
//!
//! - `estimator`: furniture dimension estimation, plus the sanity bounds the
//!   core enforces on every estimate
//! - `composition`: room image composition

mod composition;
mod estimator;

pub use composition::{CompositionRequest, CompositionService};
pub use estimator::{DimensionEstimator, check_estimate};
