//! Configuration module for Switchyard.
//!
//! Provides layered configuration loading from files, environment
//! variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SWITCHYARD_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod routing;
pub mod storage;

pub use backend::{default_backends, BackendConfig, ExecutorKind};
pub use dispatch::DispatchConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use routing::RoutingConfig;
pub use storage::StorageConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Durable storage locations
    pub storage: StorageConfig,
    /// Scorer policy constants
    pub routing: RoutingConfig,
    /// Dispatch timeouts and cooldowns
    pub dispatch: DispatchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Backend definitions, in declaration order
    pub backends: Vec<BackendConfig>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            routing: RoutingConfig::default(),
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig::default(),
            backends: default_backends(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from a TOML file.
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("SWITCHYARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SWITCHYARD_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(dir) = std::env::var("SWITCHYARD_DATA_DIR") {
            self.storage.data_dir = dir.into();
        }
        if let Ok(backend) = std::env::var("SWITCHYARD_DEFAULT_BACKEND") {
            self.routing.default_backend = backend;
        }
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backends.is_empty() {
            return Err(ConfigError::Validation {
                field: "backends".to_string(),
                message: "at least one backend is required".to_string(),
            });
        }

        for (i, backend) in self.backends.iter().enumerate() {
            if backend.id.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("backends[{}].id", i),
                    message: "ID cannot be empty".to_string(),
                });
            }
            if backend.input_cost < 0.0 || backend.output_cost < 0.0 {
                return Err(ConfigError::Validation {
                    field: format!("backends[{}]", i),
                    message: "costs cannot be negative".to_string(),
                });
            }
        }

        if !self
            .backends
            .iter()
            .any(|b| b.id == self.routing.default_backend)
        {
            return Err(ConfigError::Validation {
                field: "routing.default_backend".to_string(),
                message: format!(
                    "'{}' does not name a configured backend",
                    self.routing.default_backend
                ),
            });
        }

        if self.routing.confidence_divisor <= 0.0 {
            return Err(ConfigError::Validation {
                field: "routing.confidence_divisor".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}
