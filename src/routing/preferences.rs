//! Caller execution preferences.

use serde::{Deserialize, Serialize};

/// Preferences that shape backend scoring.
///
/// `force_backend` is an escape hatch that bypasses scoring entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePreferences {
    /// Route to this backend unconditionally
    pub force_backend: Option<String>,

    /// Favor cheaper backends
    pub prefer_cost: bool,

    /// Favor faster backends
    pub prefer_speed: bool,

    /// Favor higher-quality backends
    pub prefer_quality: bool,
}
