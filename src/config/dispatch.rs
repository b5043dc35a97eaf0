//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts and cooldowns for the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Per-attempt execution timeout in seconds
    pub default_timeout_secs: u64,

    /// Cooldown applied when a rate-limit signal carries no reset time
    pub rate_limit_cooldown_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 300,
            rate_limit_cooldown_secs: 3600,
        }
    }
}

impl DispatchConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}
