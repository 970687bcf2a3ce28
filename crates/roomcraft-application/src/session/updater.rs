//! Session updater helper for the load/modify/save pattern.
//!
//! Callers serialize access with [`SessionLocks`](super::SessionLocks)
//! before using it; the updater itself does no locking.

use roomcraft_core::error::{Result, RoomcraftError};
use roomcraft_core::session::{Session, SessionRepository};
use std::sync::Arc;

/// Loads sessions, applies a transition, and writes the result back.
///
/// A transition that fails leaves the stored session untouched.
pub struct SessionUpdater {
    repository: Arc<dyn SessionRepository>,
}

impl SessionUpdater {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Loads a session or fails with `NotFound("Session", id)`.
    pub async fn load(&self, session_id: &str) -> Result<Session> {
        self.repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| RoomcraftError::not_found("Session", session_id))
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        tracing::debug!(
            "[SessionUpdater] Saving session: id={}, stage={:?}",
            session.id,
            session.stage
        );
        self.repository.save(session).await
    }

    /// Applies `updater` to a fresh copy of the session and saves it when
    /// the updater succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session doesn't exist
    /// - The updater function returns an error
    /// - Saving to storage fails
    pub async fn update<T, F>(&self, session_id: &str, updater: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        tracing::debug!("[SessionUpdater] update() called for session_id: {}", session_id);

        let mut session = self.load(session_id).await?;
        let output = updater(&mut session)?;
        self.save(&session).await?;
        Ok(output)
    }
}
