use crate::persist::PersistError;
use thiserror::Error;

/// Errors from result-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("No outcome recorded for task '{0}'")]
    UnknownTask(String),
}
