use thiserror::Error;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A backend with the same ID was already registered
    #[error("Duplicate backend ID: {0}")]
    DuplicateBackend(String),

    /// No backend with the given ID exists
    #[error("Backend not found: {0}")]
    BackendNotFound(String),
}
