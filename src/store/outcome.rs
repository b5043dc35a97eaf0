//! Task outcome records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record of a finished task.
///
/// Created once, immutable except for the `reported` flag, which flips when
/// a downstream reporter has consumed the outcome (at-most-once delivery
/// across restarts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Task identifier
    pub id: String,
    /// Backend that produced the result (or was last attempted on failure)
    pub backend: String,
    /// Completion timestamp
    pub finished_at: DateTime<Utc>,
    /// Whether execution succeeded
    pub success: bool,
    /// Wall-clock execution time of the winning attempt
    pub duration_ms: u64,
    /// Result payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Error summary, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Estimated cost of the execution
    pub cost_estimate: f64,
    /// Whether a reporter has already consumed this outcome
    pub reported: bool,
}

impl TaskOutcome {
    /// Build a success record.
    pub fn success(
        id: &str,
        backend: &str,
        content: String,
        duration_ms: u64,
        cost_estimate: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            backend: backend.to_string(),
            finished_at: Utc::now(),
            success: true,
            duration_ms,
            content: Some(content),
            error: None,
            cost_estimate,
            reported: false,
        }
    }

    /// Build a failure record with an aggregated error summary.
    pub fn failure(id: &str, backend: &str, error: String, duration_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            backend: backend.to_string(),
            finished_at: Utc::now(),
            success: false,
            duration_ms,
            content: None,
            error: Some(error),
            cost_estimate: 0.0,
            reported: false,
        }
    }
}
