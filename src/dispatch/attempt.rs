//! Per-attempt result values.
//!
//! The fallback loop consumes explicit success/failure values instead of
//! driving control flow through caught errors.

use crate::executor::{ExecutionResponse, ExecutorError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A successful attempt.
#[derive(Debug)]
pub struct AttemptSuccess {
    pub backend: String,
    pub response: ExecutionResponse,
    pub duration_ms: u64,
}

/// A failed attempt, with the fields the loop needs to decide what next.
#[derive(Debug)]
pub struct AttemptFailure {
    pub backend: String,
    pub summary: String,
    /// Set when the failure was a rate limit; triggers the fallback
    /// transition in addition to continuing the chain.
    pub rate_limit_reset: Option<Option<DateTime<Utc>>>,
}

impl AttemptFailure {
    pub fn from_error(backend: &str, error: &ExecutorError) -> Self {
        let rate_limit_reset = match error {
            ExecutorError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        };
        Self {
            backend: backend.to_string(),
            summary: error.to_string(),
            rate_limit_reset,
        }
    }
}

/// One entry in the aggregated error of an exhausted chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptError {
    pub backend: String,
    pub error: String,
}
