//! Result Store: durable, individually addressable task outcomes.
//!
//! One JSON document per outcome, named by task ID, so a separate reporting
//! process can poll `list_unreported` and acknowledge with `mark_reported`
//! without losing results across restarts. An in-memory index of unreported
//! IDs is rebuilt by scanning the directory at open time.

mod error;
mod outcome;

pub use error::StoreError;
pub use outcome::TaskOutcome;

use crate::persist;
use dashmap::DashMap;
use std::path::PathBuf;
use tokio::fs;

/// Append-only store of task outcomes.
pub struct ResultStore {
    dir: PathBuf,
    unreported: DashMap<String, ()>,
}

impl ResultStore {
    /// Open (or create) the store directory and rebuild the unreported
    /// index from the documents on disk.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(persist::PersistError::from)?;

        let unreported = DashMap::new();
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(persist::PersistError::from)?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(persist::PersistError::from)?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(outcome) = persist::read_json::<TaskOutcome>(&path).await? {
                if !outcome.reported {
                    unreported.insert(outcome.id, ());
                }
            }
        }

        Ok(Self { dir, unreported })
    }

    fn outcome_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_id(id)))
    }

    /// Record an outcome. Write failures are fatal to the caller's dispatch.
    pub async fn record(&self, outcome: &TaskOutcome) -> Result<(), StoreError> {
        persist::write_json_atomic(&self.outcome_path(&outcome.id), outcome).await?;
        if !outcome.reported {
            self.unreported.insert(outcome.id.clone(), ());
        }
        Ok(())
    }

    /// Fetch a single outcome by task ID.
    pub async fn get(&self, id: &str) -> Result<Option<TaskOutcome>, StoreError> {
        Ok(persist::read_json(&self.outcome_path(id)).await?)
    }

    /// All outcomes not yet consumed by a reporter, oldest first.
    pub async fn list_unreported(&self) -> Result<Vec<TaskOutcome>, StoreError> {
        let ids: Vec<String> = self.unreported.iter().map(|e| e.key().clone()).collect();
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(outcome) = self.get(&id).await? {
                outcomes.push(outcome);
            }
        }
        outcomes.sort_by_key(|o| o.finished_at);
        Ok(outcomes)
    }

    /// Flip an outcome's reported flag and drop it from the unreported index.
    pub async fn mark_reported(&self, id: &str) -> Result<(), StoreError> {
        let mut outcome = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::UnknownTask(id.to_string()))?;
        outcome.reported = true;
        persist::write_json_atomic(&self.outcome_path(id), &outcome).await?;
        self.unreported.remove(id);
        Ok(())
    }

    /// Count of unreported outcomes (index only; no disk reads).
    pub fn unreported_count(&self) -> usize {
        self.unreported.len()
    }

    /// All recorded outcomes, oldest first.
    pub async fn list_all(&self) -> Result<Vec<TaskOutcome>, StoreError> {
        let mut outcomes = Vec::new();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(persist::PersistError::from)?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(persist::PersistError::from)?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(outcome) = persist::read_json::<TaskOutcome>(&path).await? {
                outcomes.push(outcome);
            }
        }
        outcomes.sort_by_key(|o| o.finished_at);
        Ok(outcomes)
    }
}

/// Task IDs name files on disk; anything outside a conservative character
/// set is replaced so caller-supplied IDs cannot escape the store directory.
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
