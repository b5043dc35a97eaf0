//! Agent-CLI subprocess adapter.
//!
//! Runs a local agent CLI in one-shot mode and captures its output. The
//! adapter watches stdout/stderr for usage-limit phrasing because agent
//! CLIs tend to report limits as text, sometimes with a zero exit code.

use super::{ExecutionBackend, ExecutionMode, ExecutionRequest, ExecutionResponse, ExecutorError, Usage};
use async_trait::async_trait;
use regex::RegexBuilder;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Phrases indicating the CLI hit a usage or rate limit.
const LIMIT_PATTERNS: &[&str] = &[
    r"hit your limit",
    r"rate.?limit",
    r"usage.?limit",
    r"quota.?exceeded",
    r"too.?many.?requests",
];

/// Executor for local agent-CLI backends.
pub struct AgentCliExecutor {
    id: String,
    name: String,
    command: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    limit_patterns: Vec<regex::Regex>,
}

impl AgentCliExecutor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
        working_dir: Option<PathBuf>,
    ) -> Result<Self, ExecutorError> {
        let limit_patterns = LIMIT_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ExecutorError::Configuration(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: id.into(),
            name: name.into(),
            command: command.into(),
            args,
            working_dir,
            limit_patterns,
        })
    }

    fn looks_rate_limited(&self, output: &str) -> bool {
        self.limit_patterns.iter().any(|p| p.is_match(output))
    }
}

#[async_trait]
impl ExecutionBackend for AgentCliExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutorError> {
        let prompt = request.prompt();

        let mut command = Command::new(&self.command);
        command.args(&self.args);
        if request.mode == ExecutionMode::Json {
            command.arg("--output-format").arg("json");
        }
        command.arg(&prompt);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = tokio::time::timeout(request.timeout, command.output())
            .await
            .map_err(|_| ExecutorError::Timeout(request.timeout.as_millis() as u64))?
            .map_err(|e| ExecutorError::Process {
                code: None,
                stderr: format!("failed to spawn '{}': {}", self.command, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let combined = format!("{}\n{}", stdout, stderr);

        if self.looks_rate_limited(&combined) {
            return Err(ExecutorError::RateLimited { retry_after: None });
        }
        if !output.status.success() {
            return Err(ExecutorError::Process {
                code: output.status.code(),
                stderr: stderr.chars().take(500).collect(),
            });
        }

        let usage = Usage::estimate(&prompt, &stdout);
        Ok(ExecutionResponse {
            content: stdout,
            usage,
            cost_estimate: 0.0,
        })
    }
}
