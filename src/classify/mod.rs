//! Task classification against per-backend pattern groups.
//!
//! The classifier maps a task description to a per-backend match count.
//! It is a total function: any input, including the empty string, yields
//! a count for every backend (possibly zero). Swapping the matching
//! strategy only requires a new [`Classifier`] implementation; the
//! dispatcher never sees regexes.

pub mod patterns;

pub use patterns::{PatternSet, DEFAULT_PATTERN_SETS, PRIMARY_CAPABILITY_PATTERNS};

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Per-backend match counts produced by classification.
pub type MatchCounts = HashMap<String, usize>;

/// Strategy interface for task classification.
pub trait Classifier: Send + Sync {
    /// Count pattern matches per backend. Total: never fails.
    fn classify(&self, description: &str) -> MatchCounts;

    /// Whether the task depends on a capability degraded during fallback
    /// (session memory, outbound messaging, scheduled work).
    fn requires_primary_capability(&self, description: &str) -> bool;
}

/// One backend's compiled pattern group.
struct CompiledGroup {
    backend_id: String,
    patterns: Vec<Regex>,
}

/// Regex-based classifier over per-backend pattern groups.
pub struct RegexClassifier {
    groups: Vec<CompiledGroup>,
    primary_capability: Vec<Regex>,
}

impl RegexClassifier {
    /// Compile the default pattern tables.
    pub fn with_default_patterns() -> Result<Self, regex::Error> {
        Self::new(
            DEFAULT_PATTERN_SETS
                .iter()
                .map(|set| {
                    (
                        set.backend_id.to_string(),
                        set.patterns.iter().map(|p| p.to_string()).collect(),
                    )
                })
                .collect(),
            PRIMARY_CAPABILITY_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        )
    }

    /// Compile arbitrary pattern groups (backend ID → patterns).
    pub fn new(
        groups: Vec<(String, Vec<String>)>,
        primary_capability: Vec<String>,
    ) -> Result<Self, regex::Error> {
        let compiled = groups
            .into_iter()
            .map(|(backend_id, patterns)| {
                let patterns = patterns
                    .iter()
                    .map(|p| compile_insensitive(p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledGroup {
                    backend_id,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let primary_capability = primary_capability
            .iter()
            .map(|p| compile_insensitive(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            groups: compiled,
            primary_capability,
        })
    }
}

fn compile_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl Classifier for RegexClassifier {
    fn classify(&self, description: &str) -> MatchCounts {
        self.groups
            .iter()
            .map(|group| {
                let count = group
                    .patterns
                    .iter()
                    .filter(|p| p.is_match(description))
                    .count();
                (group.backend_id.clone(), count)
            })
            .collect()
    }

    fn requires_primary_capability(&self, description: &str) -> bool {
        self.primary_capability
            .iter()
            .any(|p| p.is_match(description))
    }
}
