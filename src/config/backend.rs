//! Backend definitions: static spec fields plus executor settings.

use crate::registry::{BackendSpec, QualityClass, SpeedClass};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a backend is invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExecutorKind {
    /// OpenAI-compatible chat-completion endpoint
    Http {
        url: String,
        model: String,
        /// Environment variable holding the API key
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key_env: Option<String>,
    },
    /// Local agent CLI invoked per task
    Cli {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        working_dir: Option<PathBuf>,
    },
}

/// One backend as configured: registry spec fields plus how to execute
/// against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub id: String,
    pub name: String,
    /// Cost per million input units
    #[serde(default)]
    pub input_cost: f64,
    /// Cost per million output units
    #[serde(default)]
    pub output_cost: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub context_window: u32,
    pub speed: SpeedClass,
    pub quality: QualityClass,
    pub executor: ExecutorKind,
}

impl BackendConfig {
    /// Project the static spec fields for the registry.
    pub fn to_spec(&self) -> BackendSpec {
        BackendSpec {
            id: self.id.clone(),
            name: self.name.clone(),
            input_cost: self.input_cost,
            output_cost: self.output_cost,
            strengths: self.strengths.clone(),
            weaknesses: self.weaknesses.clone(),
            context_window: self.context_window,
            speed: self.speed,
            quality: self.quality,
        }
    }
}

/// The built-in backend table: a high-quality reasoning API, a free local
/// agent CLI, and a low-latency inference API. Declaration order matters
/// (scoring tie-break).
pub fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig {
            id: "reasoning-api".to_string(),
            name: "Reasoning API".to_string(),
            input_cost: 15.0,
            output_cost: 75.0,
            strengths: vec![
                "complex reasoning".to_string(),
                "architecture review".to_string(),
                "security analysis".to_string(),
                "long-context synthesis".to_string(),
            ],
            weaknesses: vec!["cost".to_string(), "latency".to_string()],
            context_window: 200_000,
            speed: SpeedClass::Medium,
            quality: QualityClass::Highest,
            executor: ExecutorKind::Http {
                url: "https://api.openai.com".to_string(),
                model: "gpt-4o".to_string(),
                api_key_env: Some("OPENAI_API_KEY".to_string()),
            },
        },
        BackendConfig {
            id: "agent-cli".to_string(),
            name: "Agent CLI".to_string(),
            input_cost: 0.0,
            output_cost: 0.0,
            strengths: vec![
                "code generation".to_string(),
                "frontend components".to_string(),
                "file editing".to_string(),
                "test writing".to_string(),
                "refactoring".to_string(),
            ],
            weaknesses: vec![
                "throughput".to_string(),
                "subscription limits".to_string(),
            ],
            context_window: 100_000,
            speed: SpeedClass::Slow,
            quality: QualityClass::High,
            executor: ExecutorKind::Cli {
                command: "claude".to_string(),
                args: vec!["-p".to_string()],
                working_dir: None,
            },
        },
        BackendConfig {
            id: "fast-inference".to_string(),
            name: "Fast Inference".to_string(),
            input_cost: 0.05,
            output_cost: 0.08,
            strengths: vec![
                "summarization".to_string(),
                "classification".to_string(),
                "extraction".to_string(),
                "boilerplate".to_string(),
            ],
            weaknesses: vec![
                "deep reasoning".to_string(),
                "long context".to_string(),
            ],
            context_window: 32_768,
            speed: SpeedClass::Fastest,
            quality: QualityClass::Good,
            executor: ExecutorKind::Http {
                url: "https://api.groq.com/openai".to_string(),
                model: "llama-3.1-8b-instant".to_string(),
                api_key_env: Some("GROQ_API_KEY".to_string()),
            },
        },
    ]
}
