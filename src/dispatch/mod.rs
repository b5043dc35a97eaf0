//! Task dispatch and the fallback chain.
//!
//! The dispatcher classifies and scores a task, then walks an ordered
//! attempt list: the chosen backend, its ranked alternates, and finally a
//! fixed cost-ascending secondary order so the loop always terminates with
//! somewhere to go. Each attempt is independent; failures are values, not
//! exceptions, and only persistence failures abort a dispatch.

pub mod attempt;
pub mod error;

pub use attempt::{AttemptError, AttemptFailure, AttemptSuccess};
pub use error::DispatchError;

use crate::classify::Classifier;
use crate::executor::{ExecutionBackend, ExecutionMode, ExecutionRequest};
use crate::fallback::{SharedState, TaskRecord, RATE_LIMIT_REASON};
use crate::registry::Registry;
use crate::routing::{RoutePreferences, RoutingDecision, Scorer};
use crate::store::{ResultStore, TaskOutcome};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Caller-facing options for one dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Caller-supplied task ID; generated when absent
    pub task_id: Option<String>,
    /// Scoring preferences
    pub preferences: RoutePreferences,
    /// Requested output format
    pub mode: ExecutionMode,
    /// Optional working context prepended to the task
    pub working_context: Option<String>,
    /// Per-attempt timeout override
    pub timeout: Option<Duration>,
}

/// Terminal status of a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchStatus {
    /// A backend produced a result
    Completed {
        backend: String,
        content: String,
        duration_ms: u64,
        cost_estimate: f64,
    },
    /// Fallback policy blocked the task; nothing was executed
    Blocked { reason: String },
    /// Every backend in the attempt chain failed
    Exhausted { attempts: Vec<AttemptError> },
}

/// Structured result of one dispatch. Never an exception: chain exhaustion
/// is a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub task_id: String,
    /// Whether a backend execution was attempted at all
    pub routed: bool,
    pub decision: RoutingDecision,
    #[serde(flatten)]
    pub status: DispatchStatus,
}

impl DispatchReport {
    pub fn success(&self) -> bool {
        matches!(self.status, DispatchStatus::Completed { .. })
    }
}

/// Orchestrator health summary (the status query interface).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub fallback_enabled: bool,
    pub fallback_reason: Option<String>,
    pub rate_limit_until: Option<DateTime<Utc>>,
    pub active_tasks: usize,
    pub completed_tasks: usize,
    pub unreported_outcomes: usize,
}

impl StatusSummary {
    /// Compose a summary from the state machine and the result store.
    pub async fn collect(
        state: &SharedState,
        results: &ResultStore,
    ) -> Result<Self, DispatchError> {
        let snapshot = state.snapshot().await?;
        Ok(Self {
            fallback_enabled: snapshot.enabled,
            fallback_reason: snapshot.reason,
            rate_limit_until: snapshot.rate_limit_until,
            active_tasks: snapshot.active_tasks.len(),
            completed_tasks: snapshot.completed_tasks.len(),
            unreported_outcomes: results.unreported_count(),
        })
    }
}

/// Executes tasks against the best backend, falling back on failure.
pub struct Dispatcher {
    registry: Arc<Registry>,
    classifier: Arc<dyn Classifier>,
    scorer: Scorer,
    executors: HashMap<String, Arc<dyn ExecutionBackend>>,
    state: SharedState,
    results: ResultStore,
    default_timeout: Duration,
    rate_limit_cooldown: ChronoDuration,
    secondary_order: Vec<String>,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<Registry>,
        classifier: Arc<dyn Classifier>,
        scorer: Scorer,
        executors: HashMap<String, Arc<dyn ExecutionBackend>>,
        state: SharedState,
        results: ResultStore,
        default_timeout: Duration,
        rate_limit_cooldown: Duration,
    ) -> Self {
        let secondary_order = registry.cost_ascending_order();
        Self {
            registry,
            classifier,
            scorer,
            executors,
            state,
            results,
            default_timeout,
            rate_limit_cooldown: ChronoDuration::seconds(rate_limit_cooldown.as_secs() as i64),
            secondary_order,
        }
    }

    /// Compute the routing decision for a task without executing it.
    pub fn route(&self, description: &str, preferences: &RoutePreferences) -> RoutingDecision {
        let counts = self.classifier.classify(description);
        self.scorer.score(&self.registry, &counts, preferences)
    }

    /// Execute a task end to end.
    ///
    /// Returns a structured report in all non-fatal cases; only persistence
    /// failures surface as `Err`.
    pub async fn dispatch(
        &self,
        description: &str,
        options: DispatchOptions,
    ) -> Result<DispatchReport, DispatchError> {
        let task_id = options
            .task_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let decision = self.route(description, &options.preferences);
        tracing::debug!(
            task_id = %task_id,
            backend = %decision.backend,
            confidence = decision.confidence,
            "routing decision"
        );

        // Blocking rule: fallback mode degrades capability, so tasks that
        // need the degraded capabilities wait instead of being rerouted.
        let snapshot = self.state.snapshot().await?;
        if snapshot.enabled && self.classifier.requires_primary_capability(description) {
            let reason = format!(
                "task requires a capability unavailable during fallback ({})",
                snapshot.reason.as_deref().unwrap_or("unspecified")
            );
            tracing::warn!(task_id = %task_id, %reason, "dispatch blocked");
            metrics::counter!("switchyard_dispatch_blocked_total").increment(1);
            return Ok(DispatchReport {
                task_id,
                routed: false,
                decision,
                status: DispatchStatus::Blocked { reason },
            });
        }

        let attempt_order = self.attempt_order(&decision);
        let request = ExecutionRequest {
            description: description.to_string(),
            mode: options.mode,
            working_context: options.working_context.clone(),
            timeout: options.timeout.unwrap_or(self.default_timeout),
        };

        let mut failures: Vec<AttemptError> = Vec::new();
        for backend_id in &attempt_order {
            match self.attempt(&task_id, backend_id, &request).await? {
                Ok(success) => {
                    let outcome = TaskOutcome::success(
                        &task_id,
                        &success.backend,
                        success.response.content.clone(),
                        success.duration_ms,
                        success.response.cost_estimate,
                    );
                    self.results.record(&outcome).await?;
                    self.state
                        .mutate(|s| s.finish_task(&task_id, &success.backend, true))
                        .await?;
                    tracing::info!(
                        task_id = %task_id,
                        backend = %success.backend,
                        duration_ms = success.duration_ms,
                        "task completed"
                    );
                    return Ok(DispatchReport {
                        task_id,
                        routed: true,
                        decision,
                        status: DispatchStatus::Completed {
                            backend: success.backend,
                            content: success.response.content,
                            duration_ms: success.duration_ms,
                            cost_estimate: success.response.cost_estimate,
                        },
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        task_id = %task_id,
                        backend = %failure.backend,
                        error = %failure.summary,
                        "backend attempt failed, continuing chain"
                    );
                    if let Some(reset) = failure.rate_limit_reset {
                        let until = reset.unwrap_or_else(|| Utc::now() + self.rate_limit_cooldown);
                        self.state
                            .mutate(|s| s.enter_fallback(RATE_LIMIT_REASON, Some(until)))
                            .await?;
                        metrics::counter!("switchyard_fallback_transitions_total").increment(1);
                        tracing::warn!(
                            backend = %failure.backend,
                            until = %until,
                            "rate limit detected, entering fallback mode"
                        );
                    }
                    failures.push(AttemptError {
                        backend: failure.backend,
                        error: failure.summary,
                    });
                }
            }
        }

        // Chain exhausted: record a failed outcome so the durable log covers
        // failures too, then surface a structured result.
        let summary = failures
            .iter()
            .map(|f| format!("{}: {}", f.backend, f.error))
            .collect::<Vec<_>>()
            .join("; ");
        let outcome = TaskOutcome::failure(&task_id, &decision.backend, summary, 0);
        self.results.record(&outcome).await?;
        self.state
            .mutate(|s| s.finish_task(&task_id, &decision.backend, false))
            .await?;
        metrics::counter!("switchyard_dispatch_exhausted_total").increment(1);

        Ok(DispatchReport {
            task_id,
            routed: true,
            decision,
            status: DispatchStatus::Exhausted { attempts: failures },
        })
    }

    /// Run one attempt: record the task, execute, retire the record.
    ///
    /// The outer `Result` is persistence (fatal); the inner one is the
    /// attempt value the chain consumes.
    async fn attempt(
        &self,
        task_id: &str,
        backend_id: &str,
        request: &ExecutionRequest,
    ) -> Result<Result<AttemptSuccess, AttemptFailure>, DispatchError> {
        let Some(executor) = self.executors.get(backend_id) else {
            return Ok(Err(AttemptFailure {
                backend: backend_id.to_string(),
                summary: "no executor configured".to_string(),
                rate_limit_reset: None,
            }));
        };

        let record = TaskRecord::new(
            task_id,
            &request.description,
            &request.mode.to_string(),
            backend_id,
        );
        self.state.mutate(|s| s.begin_task(record)).await?;
        metrics::counter!("switchyard_dispatch_attempts_total").increment(1);

        let started = std::time::Instant::now();
        let result = executor.execute(request).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(response) => Ok(Ok(AttemptSuccess {
                backend: backend_id.to_string(),
                response,
                duration_ms,
            })),
            Err(error) => {
                // Failed attempts leave no completion entry; the task moves
                // on to the next backend.
                self.state.mutate(|s| s.abort_task(task_id)).await?;
                Ok(Err(AttemptFailure::from_error(backend_id, &error)))
            }
        }
    }

    /// Ordered, deduplicated attempt list: chosen, ranked alternates, then
    /// the fixed cost-ascending secondary order.
    fn attempt_order(&self, decision: &RoutingDecision) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for id in std::iter::once(&decision.backend)
            .chain(decision.alternates.iter())
            .chain(self.secondary_order.iter())
        {
            if !order.contains(id) {
                order.push(id.clone());
            }
        }
        order
    }

    /// Explicit rate-limit signal from a caller.
    pub async fn report_rate_limit(
        &self,
        reset: Option<DateTime<Utc>>,
    ) -> Result<(), DispatchError> {
        let until = reset.unwrap_or_else(|| Utc::now() + self.rate_limit_cooldown);
        self.state
            .mutate(|s| s.enter_fallback(RATE_LIMIT_REASON, Some(until)))
            .await?;
        metrics::counter!("switchyard_fallback_transitions_total").increment(1);
        tracing::info!(until = %until, "rate limit reported, fallback mode active");
        Ok(())
    }

    /// Explicit clear-fallback signal from a caller.
    pub async fn clear_fallback(&self) -> Result<(), DispatchError> {
        self.state.mutate(|s| s.clear()).await?;
        tracing::info!("fallback mode cleared");
        Ok(())
    }

    /// The status query interface.
    pub async fn status(&self) -> Result<StatusSummary, DispatchError> {
        StatusSummary::collect(&self.state, &self.results).await
    }

    /// Access to the result store (reporting surface).
    pub fn results(&self) -> &ResultStore {
        &self.results
    }
}
