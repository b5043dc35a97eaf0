use serde::{Deserialize, Serialize};

/// Speed class of a backend, ordered slowest to fastest.
///
/// The derived `Ord` follows declaration order, so `Fastest` compares
/// greater than `Slow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Slow,
    Medium,
    Fast,
    Fastest,
}

/// Quality class of a backend, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityClass {
    Good,
    High,
    Highest,
}

/// Static description of an execution backend.
///
/// Pure data loaded once at startup. Runtime availability is tracked by the
/// [`Registry`](super::Registry), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSpec {
    /// Unique backend identifier (e.g., "agent-cli")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Cost per million input units (0.0 for free backends)
    pub input_cost: f64,
    /// Cost per million output units
    pub output_cost: f64,
    /// Task types this backend is good at (matched by the classifier)
    pub strengths: Vec<String>,
    /// Known weak spots, surfaced in status output
    pub weaknesses: Vec<String>,
    /// Maximum working-context size in units
    pub context_window: u32,
    /// Speed class for preference scoring
    pub speed: SpeedClass,
    /// Quality class for preference scoring
    pub quality: QualityClass,
}

impl BackendSpec {
    /// Average per-unit cost across input and output, in cost per million units.
    pub fn avg_cost(&self) -> f64 {
        (self.input_cost + self.output_cost) / 2.0
    }

    /// Whether this backend costs nothing per unit.
    pub fn is_free(&self) -> bool {
        self.avg_cost() <= f64::EPSILON
    }
}
