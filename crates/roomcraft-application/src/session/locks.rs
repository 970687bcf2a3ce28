use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Per-session mutual exclusion.
///
/// Each session id maps to its own async mutex, so operations on one session
/// run one at a time while different sessions proceed in parallel. The guard
/// may be held across `.await` points.
pub struct SessionLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Waits for exclusive access to `session_id`.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let existing = {
            let locks = self.locks.read().await;
            locks.get(session_id).cloned()
        };

        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut locks = self.locks.write().await;
                locks
                    .entry(session_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            }
        };

        tracing::debug!("[SessionLocks] waiting for session {}", session_id);
        lock.lock_owned().await
    }

    /// Drops the entry for `session_id` unless another task is holding or
    /// waiting on it.
    pub async fn release_if_idle(&self, session_id: &str) {
        let mut locks = self.locks.write().await;
        if let Some(lock) = locks.get(session_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(session_id);
            }
        }
    }

    /// Number of sessions with a lock entry.
    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_session_is_exclusive() {
        let locks = Arc::new(SessionLocks::new());
        let guard = locks.acquire("a").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn different_sessions_do_not_block() {
        let locks = SessionLocks::new();
        let _a = locks.acquire("a").await;
        let _b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b"))
            .await
            .expect("other session should not wait");
        assert_eq!(locks.len().await, 2);
    }

    #[tokio::test]
    async fn idle_entries_are_released() {
        let locks = SessionLocks::new();
        let guard = locks.acquire("a").await;
        locks.release_if_idle("a").await;
        assert_eq!(locks.len().await, 1);

        drop(guard);
        locks.release_if_idle("a").await;
        assert_eq!(locks.len().await, 0);
    }
}
