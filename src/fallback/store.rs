//! Fallback-state persistence.
//!
//! The state machine is owned explicitly and injected where needed; all
//! reads and writes go through [`SharedState`], which serializes access
//! behind one async mutex (single-writer discipline) and persists after
//! every mutation.

use super::FallbackState;
use crate::persist::{self, PersistError};
use chrono::Utc;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Load/save interface for the fallback-state document.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted state; a missing document yields the default
    /// NORMAL state.
    pub async fn load(&self) -> Result<FallbackState, PersistError> {
        Ok(persist::read_json(&self.path).await?.unwrap_or_default())
    }

    pub async fn save(&self, state: &FallbackState) -> Result<(), PersistError> {
        persist::write_json_atomic(&self.path, state).await
    }
}

/// Mutex-guarded fallback state with write-through persistence.
pub struct SharedState {
    inner: Mutex<FallbackState>,
    store: StateStore,
}

impl SharedState {
    /// Load state from the store and wrap it.
    pub async fn load(store: StateStore) -> Result<Self, PersistError> {
        let state = store.load().await?;
        Ok(Self {
            inner: Mutex::new(state),
            store,
        })
    }

    /// Read a snapshot, applying lazy cooldown expiry first.
    ///
    /// If expiry changes the state, the change is persisted before the
    /// snapshot is returned.
    pub async fn snapshot(&self) -> Result<FallbackState, PersistError> {
        let mut guard = self.inner.lock().await;
        if guard.refresh(Utc::now()) {
            self.store.save(&guard).await?;
        }
        Ok(guard.clone())
    }

    /// Apply a mutation under the lock and persist the result.
    ///
    /// Lazy expiry runs before the mutation so callers always see the
    /// current state.
    pub async fn mutate<F, R>(&self, f: F) -> Result<R, PersistError>
    where
        F: FnOnce(&mut FallbackState) -> R,
    {
        let mut guard = self.inner.lock().await;
        guard.refresh(Utc::now());
        let result = f(&mut guard);
        self.store.save(&guard).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::RATE_LIMIT_REASON;
    use chrono::Duration;

    fn store_in(dir: &tempfile::TempDir) -> StateStore {
        StateStore::new(dir.path().join("state.json"))
    }

    #[tokio::test]
    async fn missing_document_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = store_in(&dir).load().await.unwrap();
        assert_eq!(state, FallbackState::default());
    }

    #[tokio::test]
    async fn mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();

        let shared = SharedState::load(store_in(&dir)).await.unwrap();
        shared
            .mutate(|s| {
                s.enter_fallback(RATE_LIMIT_REASON, Some(Utc::now() + Duration::hours(1)))
            })
            .await
            .unwrap();

        let reloaded = store_in(&dir).load().await.unwrap();
        assert!(reloaded.enabled);
        assert_eq!(reloaded.reason.as_deref(), Some(RATE_LIMIT_REASON));
    }

    #[tokio::test]
    async fn snapshot_applies_lazy_expiry_and_persists_it() {
        let dir = tempfile::tempdir().unwrap();

        let shared = SharedState::load(store_in(&dir)).await.unwrap();
        shared
            .mutate(|s| {
                s.enter_fallback(RATE_LIMIT_REASON, Some(Utc::now() - Duration::minutes(1)))
            })
            .await
            .unwrap();

        let snapshot = shared.snapshot().await.unwrap();
        assert!(!snapshot.enabled);

        // The expiry was written through, not just applied in memory.
        let reloaded = store_in(&dir).load().await.unwrap();
        assert!(!reloaded.enabled);
    }
}
