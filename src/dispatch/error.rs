use crate::persist::PersistError;
use crate::store::StoreError;
use thiserror::Error;

/// Fatal dispatch errors.
///
/// Backend execution failures are NOT errors at this level; they are
/// consumed by the fallback chain and surface only inside the structured
/// dispatch report. Losing durability is the one thing that aborts a
/// dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Fallback state persistence failed: {0}")]
    State(#[from] PersistError),

    #[error("Result store persistence failed: {0}")]
    Store(#[from] StoreError),
}
