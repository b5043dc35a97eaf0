//! Error types for backend execution calls.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while executing a task on a backend.
///
/// `RateLimited` is special-cased by the dispatcher: it triggers the
/// NORMAL -> FALLBACK transition in addition to failing the attempt.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Backend reported a rate or usage limit.
    #[error("Backend rate-limited{}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<DateTime<Utc>> },

    /// Call exceeded its deadline.
    #[error("Execution timeout after {0}ms")]
    Timeout(u64),

    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Backend returned an error response (4xx, 5xx).
    #[error("Backend error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Subprocess backend failed.
    #[error("Process failed{}: {stderr}", code_suffix(.code))]
    Process { code: Option<i32>, stderr: String },

    /// Backend response doesn't match the expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn retry_suffix(retry_after: &Option<DateTime<Utc>>) -> String {
    match retry_after {
        Some(t) => format!(" until {}", t.to_rfc3339()),
        None => String::new(),
    }
}

fn code_suffix(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!(" with exit code {}", c),
        None => String::new(),
    }
}

impl ExecutorError {
    /// Whether this error indicates the backend is rate-limited.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ExecutorError::RateLimited { .. })
    }
}
