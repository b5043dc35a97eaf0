//! Shared test utilities for Switchyard integration tests.
//!
//! Provides scripted mock executors and a dispatcher builder so tests can
//! drive the fallback chain without real backends.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchyard::classify::RegexClassifier;
use switchyard::config::default_backends;
use switchyard::dispatch::Dispatcher;
use switchyard::executor::{
    ExecutionBackend, ExecutionRequest, ExecutionResponse, ExecutorError, Usage,
};
use switchyard::fallback::{SharedState, StateStore};
use switchyard::registry::Registry;
use switchyard::routing::Scorer;
use switchyard::store::ResultStore;

/// Scripted behavior for one mock execution call.
#[derive(Debug, Clone)]
pub enum Scripted {
    Succeed(String),
    Fail(String),
    RateLimit,
}

/// Mock backend executor driven by a script.
///
/// Each call pops the next scripted step; an exhausted script repeats the
/// configured default. Calls are appended to a shared log so tests can
/// assert attempt order across executors.
pub struct MockExecutor {
    id: String,
    script: Mutex<VecDeque<Scripted>>,
    default: Scripted,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockExecutor {
    pub fn new(
        id: &str,
        script: Vec<Scripted>,
        default: Scripted,
        calls: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            id: id.to_string(),
            script: Mutex::new(script.into()),
            default,
            calls,
        }
    }

    pub fn always_succeeds(id: &str, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self::new(
            id,
            vec![],
            Scripted::Succeed(format!("{} result", id)),
            calls,
        )
    }

    pub fn always_fails(id: &str, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self::new(id, vec![], Scripted::Fail("simulated failure".into()), calls)
    }
}

#[async_trait]
impl ExecutionBackend for MockExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    async fn execute(
        &self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResponse, ExecutorError> {
        self.calls.lock().unwrap().push(self.id.clone());

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        match step {
            Scripted::Succeed(content) => Ok(ExecutionResponse {
                usage: Usage::estimate(&request.prompt(), &content),
                content,
                cost_estimate: 0.0,
            }),
            Scripted::Fail(message) => Err(ExecutorError::Process {
                code: Some(1),
                stderr: message,
            }),
            Scripted::RateLimit => Err(ExecutorError::RateLimited { retry_after: None }),
        }
    }
}

/// Backend IDs from the default registry, in declaration order.
pub const BACKEND_IDS: [&str; 3] = ["reasoning-api", "agent-cli", "fast-inference"];

/// Build a dispatcher over the default backend table with mock executors.
pub async fn build_dispatcher(
    data_dir: &Path,
    executors: HashMap<String, Arc<dyn ExecutionBackend>>,
) -> Dispatcher {
    let registry = Arc::new(
        Registry::from_specs(default_backends().iter().map(|b| b.to_spec()).collect()).unwrap(),
    );
    let classifier = Arc::new(RegexClassifier::with_default_patterns().unwrap());
    let scorer = Scorer::new(50.0, "agent-cli");
    let state = SharedState::load(StateStore::new(data_dir.join("state.json")))
        .await
        .unwrap();
    let results = ResultStore::open(data_dir.join("outcomes")).await.unwrap();

    Dispatcher::new(
        registry,
        classifier,
        scorer,
        executors,
        state,
        results,
        Duration::from_secs(5),
        Duration::from_secs(3600),
    )
}

/// Shorthand: one mock per default backend, all scripted identically.
pub fn uniform_executors(
    calls: &Arc<Mutex<Vec<String>>>,
    build: impl Fn(&str, Arc<Mutex<Vec<String>>>) -> MockExecutor,
) -> HashMap<String, Arc<dyn ExecutionBackend>> {
    BACKEND_IDS
        .iter()
        .map(|id| {
            let executor: Arc<dyn ExecutionBackend> = Arc::new(build(id, Arc::clone(calls)));
            (id.to_string(), executor)
        })
        .collect()
}
