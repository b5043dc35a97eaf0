//! Executor construction from backend configuration.

use super::{AgentCliExecutor, ExecutionBackend, ExecutorError, HttpChatExecutor};
use crate::config::{BackendConfig, ExecutorKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Build one executor per configured backend, keyed by backend ID.
///
/// API keys are resolved from the environment at construction time; a
/// missing key is not an error here (the backend will fail its attempts
/// with an upstream auth error instead), because a partially configured
/// orchestrator must still route around the gap.
pub fn build_executors(
    backends: &[BackendConfig],
) -> Result<HashMap<String, Arc<dyn ExecutionBackend>>, ExecutorError> {
    let mut executors: HashMap<String, Arc<dyn ExecutionBackend>> = HashMap::new();

    for backend in backends {
        let executor: Arc<dyn ExecutionBackend> = match &backend.executor {
            ExecutorKind::Http {
                url,
                model,
                api_key_env,
            } => {
                let api_key = api_key_env
                    .as_ref()
                    .and_then(|var| std::env::var(var).ok());
                Arc::new(HttpChatExecutor::new(
                    backend.id.clone(),
                    backend.name.clone(),
                    url.clone(),
                    model.clone(),
                    api_key,
                    backend.input_cost,
                    backend.output_cost,
                )?)
            }
            ExecutorKind::Cli {
                command,
                args,
                working_dir,
            } => Arc::new(AgentCliExecutor::new(
                backend.id.clone(),
                backend.name.clone(),
                command.clone(),
                args.clone(),
                working_dir.clone(),
            )?),
        };
        executors.insert(backend.id.clone(), executor);
    }

    Ok(executors)
}
