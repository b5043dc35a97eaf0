//! Backend Registry module.
//!
//! Static table of execution backends plus their runtime availability flags.
//! Declaration order is significant: scoring ties are broken by it, so the
//! registry preserves the order in which backends were registered.

mod backend;
mod error;

pub use backend::*;
pub use error::*;

use dashmap::DashMap;

/// The Backend Registry stores all known execution backends.
///
/// Specs are immutable after registration; availability is the only runtime
/// state and lives in a concurrent map so health signals can flip it without
/// locking the whole table.
pub struct Registry {
    specs: Vec<BackendSpec>,
    availability: DashMap<String, bool>,
}

impl Registry {
    /// Create a new empty Registry.
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            availability: DashMap::new(),
        }
    }

    /// Build a registry from an ordered list of specs.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateBackend` if two specs share an ID.
    pub fn from_specs(specs: Vec<BackendSpec>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    /// Register a backend, appending it to the declaration order.
    ///
    /// New backends start available.
    pub fn register(&mut self, spec: BackendSpec) -> Result<(), RegistryError> {
        if self.specs.iter().any(|s| s.id == spec.id) {
            return Err(RegistryError::DuplicateBackend(spec.id));
        }
        self.availability.insert(spec.id.clone(), true);
        self.specs.push(spec);
        Ok(())
    }

    /// All specs in declaration order.
    pub fn specs(&self) -> &[BackendSpec] {
        &self.specs
    }

    /// Look up a spec by ID.
    pub fn get(&self, id: &str) -> Option<&BackendSpec> {
        self.specs.iter().find(|s| s.id == id)
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Current availability flag for a backend. Unknown IDs are unavailable.
    pub fn is_available(&self, id: &str) -> bool {
        self.availability.get(id).map(|a| *a).unwrap_or(false)
    }

    /// Flip the availability flag for a backend.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::BackendNotFound` for unknown IDs.
    pub fn set_available(&self, id: &str, available: bool) -> Result<(), RegistryError> {
        if self.get(id).is_none() {
            return Err(RegistryError::BackendNotFound(id.to_string()));
        }
        self.availability.insert(id.to_string(), available);
        Ok(())
    }

    /// Backend IDs ordered by ascending average cost.
    ///
    /// Stable with respect to declaration order for equal costs. Used as the
    /// fixed secondary order of the dispatch attempt chain.
    pub fn cost_ascending_order(&self) -> Vec<String> {
        let mut indexed: Vec<&BackendSpec> = self.specs.iter().collect();
        indexed.sort_by(|a, b| {
            a.avg_cost()
                .partial_cmp(&b.avg_cost())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indexed.into_iter().map(|s| s.id.clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
