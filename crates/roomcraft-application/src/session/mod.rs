//! Session application services.
//!
//! - `locks`: per-session serialization
//! - `updater`: load/modify/save against the repository

mod locks;
mod updater;

pub use locks::SessionLocks;
pub use updater::SessionUpdater;
