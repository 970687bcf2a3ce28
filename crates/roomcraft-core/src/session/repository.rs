//! Session repository trait.
//!
//! Defines the interface for session storage operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store owning session records, keyed by session id.
///
/// This trait decouples the workflow from the backing mechanism (in-memory
/// map, key-value service, database).
///
/// # Implementation Notes
///
/// Implementations only need to make individual calls safe to run
/// concurrently. Serializing the load → mutate → save cycle of a single
/// session is the caller's job.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Inserts or replaces a session.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a session. Deleting an unknown id is not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions.
    async fn list_all(&self) -> Result<Vec<Session>>;
}
