//! Durable-storage locations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where persisted state lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for all persisted documents
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".switchyard"),
        }
    }
}

impl StorageConfig {
    /// Path of the fallback-state document.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    /// Directory of per-task outcome documents.
    pub fn outcomes_dir(&self) -> PathBuf {
        self.data_dir.join("outcomes")
    }
}
