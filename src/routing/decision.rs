//! Routing decision produced per task.

use serde::Serialize;

/// Outcome of scoring: which backend to try first, and why.
///
/// Ephemeral; recomputed per call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    /// Chosen backend ID
    pub backend: String,

    /// Normalized confidence in [0, 1]
    pub confidence: f64,

    /// Human-readable justification for the choice
    pub justification: String,

    /// Top non-chosen backends in rank order (at most two)
    pub alternates: Vec<String>,
}
