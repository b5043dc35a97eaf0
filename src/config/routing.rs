//! Routing configuration.

use serde::{Deserialize, Serialize};

/// Policy constants for the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Divisor normalizing the top score into confidence.
    /// Policy constant; 50 means one strong pattern match plus one
    /// preference bonus roughly saturates confidence.
    pub confidence_divisor: f64,

    /// Backend chosen when no signal discriminates ("balanced" default).
    pub default_backend: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            confidence_divisor: 50.0,
            default_backend: "agent-cli".to_string(),
        }
    }
}
