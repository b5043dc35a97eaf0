//! Backend scoring and ranking.
//!
//! Converts classifier match counts plus caller preferences into a ranked
//! [`RoutingDecision`]. Scoring is a total function: it always produces a
//! decision, degrading to the configured balanced default when no backend
//! scores above zero.

pub mod decision;
pub mod preferences;

pub use decision::RoutingDecision;
pub use preferences::RoutePreferences;

use crate::classify::MatchCounts;
use crate::registry::{QualityClass, Registry, SpeedClass};

/// Points per classifier pattern match.
const MATCH_WEIGHT: f64 = 10.0;

/// Cap on the cost-preference bonus; free backends receive exactly this.
const MAX_COST_BONUS: f64 = 20.0;

/// Scale for the inverse-cost bonus (bonus = scale / avg cost, capped).
const COST_BONUS_SCALE: f64 = 10.0;

/// Speed-preference bonus, strictly decreasing by class.
fn speed_bonus(class: SpeedClass) -> f64 {
    match class {
        SpeedClass::Fastest => 8.0,
        SpeedClass::Fast => 6.0,
        SpeedClass::Medium => 4.0,
        SpeedClass::Slow => 2.0,
    }
}

/// Quality-preference bonus, strictly decreasing by class.
fn quality_bonus(class: QualityClass) -> f64 {
    match class {
        QualityClass::Highest => 9.0,
        QualityClass::High => 6.0,
        QualityClass::Good => 3.0,
    }
}

fn cost_bonus(avg_cost: f64) -> f64 {
    if avg_cost <= f64::EPSILON {
        MAX_COST_BONUS
    } else {
        (COST_BONUS_SCALE / avg_cost).min(MAX_COST_BONUS)
    }
}

/// Scores backends and produces routing decisions.
pub struct Scorer {
    /// Divisor normalizing the top score into a confidence value.
    /// Policy constant (default 50), configurable, not load-bearing.
    confidence_divisor: f64,

    /// Backend chosen when no signal and no preference discriminates.
    default_backend: String,
}

#[derive(Debug)]
struct Candidate {
    id: String,
    score: f64,
    justification: String,
}

impl Scorer {
    pub fn new(confidence_divisor: f64, default_backend: impl Into<String>) -> Self {
        Self {
            confidence_divisor,
            default_backend: default_backend.into(),
        }
    }

    /// Produce a routing decision from match counts and preferences.
    ///
    /// Total: unknown backends in `counts` are ignored, unavailable backends
    /// are excluded, and an all-zero field falls back to the default backend
    /// with confidence 0.3.
    pub fn score(
        &self,
        registry: &Registry,
        counts: &MatchCounts,
        preferences: &RoutePreferences,
    ) -> RoutingDecision {
        if let Some(forced) = &preferences.force_backend {
            return RoutingDecision {
                backend: forced.clone(),
                confidence: 1.0,
                justification: format!("backend '{}' forced by caller", forced),
                alternates: Vec::new(),
            };
        }

        let mut ranked: Vec<Candidate> = Vec::new();
        for spec in registry.specs() {
            if !registry.is_available(&spec.id) {
                continue;
            }

            let matches = counts.get(&spec.id).copied().unwrap_or(0);
            let mut score = matches as f64 * MATCH_WEIGHT;
            let mut parts = vec![format!("{} pattern match(es)", matches)];

            if preferences.prefer_cost {
                let bonus = cost_bonus(spec.avg_cost());
                score += bonus;
                parts.push(format!("cost preference +{:.1}", bonus));
            }
            if preferences.prefer_speed {
                let bonus = speed_bonus(spec.speed);
                score += bonus;
                parts.push(format!("speed preference +{:.1}", bonus));
            }
            if preferences.prefer_quality {
                let bonus = quality_bonus(spec.quality);
                score += bonus;
                parts.push(format!("quality preference +{:.1}", bonus));
            }

            ranked.push(Candidate {
                id: spec.id.clone(),
                score,
                justification: parts.join(", "),
            });
        }

        // Stable sort: equal scores keep registry declaration order.
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if ranked.is_empty() || ranked[0].score <= 0.0 {
            return self.default_decision(registry, &ranked);
        }

        let top = &ranked[0];
        let confidence = (top.score / self.confidence_divisor).min(1.0);
        let alternates = ranked[1..]
            .iter()
            .take(2)
            .map(|c| c.id.clone())
            .collect();

        RoutingDecision {
            backend: top.id.clone(),
            confidence,
            justification: format!("score {:.1}: {}", top.score, top.justification),
            alternates,
        }
    }

    fn default_decision(&self, registry: &Registry, ranked: &[Candidate]) -> RoutingDecision {
        let alternates: Vec<String> = if ranked.is_empty() {
            registry
                .specs()
                .iter()
                .filter(|s| s.id != self.default_backend)
                .take(2)
                .map(|s| s.id.clone())
                .collect()
        } else {
            ranked
                .iter()
                .filter(|c| c.id != self.default_backend)
                .take(2)
                .map(|c| c.id.clone())
                .collect()
        };

        RoutingDecision {
            backend: self.default_backend.clone(),
            confidence: 0.3,
            justification: "no strong signal".to_string(),
            alternates,
        }
    }
}
