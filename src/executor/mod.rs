//! Uniform execution contract over heterogeneous backends.
//!
//! Every backend, whatever its underlying nature (remote inference API,
//! local agent CLI), satisfies the same [`ExecutionBackend`] trait. The
//! dispatcher routes purely against this seam and never branches on the
//! adapter type.

pub mod error;
pub mod factory;
pub mod http;
pub mod process;

pub use error::ExecutorError;
pub use factory::build_executors;
pub use http::HttpChatExecutor;
pub use process::AgentCliExecutor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Output format requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Plain text response
    #[default]
    Text,
    /// Structured JSON response
    Json,
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ExecutionMode::Text),
            "json" => Ok(ExecutionMode::Json),
            _ => Err(format!("Unknown execution mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Text => write!(f, "text"),
            ExecutionMode::Json => write!(f, "json"),
        }
    }
}

/// A single execution request against one backend.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Task description to execute
    pub description: String,
    /// Requested output format
    pub mode: ExecutionMode,
    /// Optional working context prepended to the task
    pub working_context: Option<String>,
    /// Deadline for this call; exceeding it is a failure
    pub timeout: Duration,
}

impl ExecutionRequest {
    /// Full prompt: working context (if any) followed by the task.
    pub fn prompt(&self) -> String {
        match &self.working_context {
            Some(context) => format!("{}\n\n{}", context, self.description),
            None => self.description.clone(),
        }
    }
}

/// Input/output volume consumed by an execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_units: u64,
    pub output_units: u64,
}

impl Usage {
    /// Heuristic estimate when the backend reports no usage: chars / 4.
    pub fn estimate(prompt: &str, output: &str) -> Self {
        Self {
            input_units: (prompt.len() / 4) as u64,
            output_units: (output.len() / 4) as u64,
        }
    }
}

/// Result of a successful execution call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResponse {
    /// Result payload
    pub content: String,
    /// Volume consumed
    pub usage: Usage,
    /// Estimated cost of this call
    pub cost_estimate: f64,
}

/// Uniform interface for all execution backends.
///
/// Object-safe; the dispatcher holds adapters as `Arc<dyn ExecutionBackend>`.
/// Implementations enforce the request's timeout themselves and map a
/// deadline overrun to [`ExecutorError::Timeout`].
#[async_trait]
pub trait ExecutionBackend: Send + Sync + 'static {
    /// Backend ID this executor serves (matches a registry spec).
    fn id(&self) -> &str;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Execute one task. Errors are per-attempt; the dispatcher decides
    /// whether to continue the fallback chain.
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutorError>;
}
