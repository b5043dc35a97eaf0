//! Fallback state machine.
//!
//! Two states: NORMAL (no fallback reason active) and FALLBACK(reason,
//! until). The transition into FALLBACK comes from an explicit rate-limit
//! signal or from the dispatcher detecting a rate-limit error itself; the
//! transition back is an explicit clear or lazy expiry of the cooldown
//! window on the next read. The state is never eagerly time-driven.

mod store;

pub use store::{SharedState, StateStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason string recorded for rate-limit transitions.
pub const RATE_LIMIT_REASON: &str = "rate-limit";

/// Execution status of an in-flight task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
}

/// An in-flight task, created when a dispatch attempt begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier (caller-supplied or generated)
    pub id: String,
    /// Original task description
    pub description: String,
    /// Execution mode requested by the caller
    pub mode: String,
    /// Backend the attempt was assigned to
    pub backend: String,
    /// When the attempt started
    pub started_at: DateTime<Utc>,
    /// Always `Running` while in `active_tasks`
    pub status: TaskStatus,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, description: &str, mode: &str, backend: &str) -> Self {
        Self {
            id: id.into(),
            description: description.to_string(),
            mode: mode.to_string(),
            backend: backend.to_string(),
            started_at: Utc::now(),
            status: TaskStatus::Running,
        }
    }
}

/// Completion summary appended when a task finishes, success or not.
///
/// The full outcome payload lives in the result store; this log only keeps
/// bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub backend: String,
    pub success: bool,
    pub finished_at: DateTime<Utc>,
}

/// Persisted singleton tracking fallback mode and task bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackState {
    /// Whether fallback mode is active
    pub enabled: bool,
    /// Why fallback was entered, if active
    pub reason: Option<String>,
    /// Cooldown expiry for rate-limit fallback, if any
    pub rate_limit_until: Option<DateTime<Utc>>,
    /// Tasks currently executing
    pub active_tasks: Vec<TaskRecord>,
    /// Append-only log of finished tasks
    pub completed_tasks: Vec<CompletedTask>,
}

impl FallbackState {
    /// Apply lazy expiry: if the cooldown has passed, drop back to NORMAL.
    ///
    /// Returns true if the state changed (and should be persisted).
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(until) = self.rate_limit_until {
            if until <= now {
                self.enabled = false;
                self.reason = None;
                self.rate_limit_until = None;
                return true;
            }
        }
        false
    }

    /// Enter FALLBACK. `until` is the cooldown expiry; None means the state
    /// holds until an explicit clear.
    pub fn enter_fallback(&mut self, reason: &str, until: Option<DateTime<Utc>>) {
        self.enabled = true;
        self.reason = Some(reason.to_string());
        self.rate_limit_until = until;
    }

    /// Return to NORMAL.
    pub fn clear(&mut self) {
        self.enabled = false;
        self.reason = None;
        self.rate_limit_until = None;
    }

    /// Record the start of a dispatch attempt. Replaces any stale record
    /// with the same task ID.
    pub fn begin_task(&mut self, record: TaskRecord) {
        self.active_tasks.retain(|t| t.id != record.id);
        self.active_tasks.push(record);
    }

    /// Retire an attempt that failed; the task continues on another backend.
    pub fn abort_task(&mut self, id: &str) {
        self.active_tasks.retain(|t| t.id != id);
    }

    /// Retire a task terminally and append its completion summary.
    pub fn finish_task(&mut self, id: &str, backend: &str, success: bool) {
        self.active_tasks.retain(|t| t.id != id);
        self.completed_tasks.push(CompletedTask {
            id: id.to_string(),
            backend: backend.to_string(),
            success,
            finished_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn default_state_is_normal() {
        let state = FallbackState::default();
        assert!(!state.enabled);
        assert!(state.reason.is_none());
        assert!(state.rate_limit_until.is_none());
    }

    #[test]
    fn enter_and_clear() {
        let mut state = FallbackState::default();
        state.enter_fallback(RATE_LIMIT_REASON, Some(Utc::now() + Duration::hours(1)));
        assert!(state.enabled);
        assert_eq!(state.reason.as_deref(), Some(RATE_LIMIT_REASON));

        state.clear();
        assert!(!state.enabled);
        assert!(state.rate_limit_until.is_none());
    }

    #[test]
    fn refresh_expires_past_cooldown() {
        let mut state = FallbackState::default();
        state.enter_fallback(RATE_LIMIT_REASON, Some(Utc::now() - Duration::minutes(5)));

        assert!(state.refresh(Utc::now()));
        assert!(!state.enabled);
        assert!(state.reason.is_none());
        assert!(state.rate_limit_until.is_none());
    }

    #[test]
    fn refresh_keeps_future_cooldown() {
        let mut state = FallbackState::default();
        state.enter_fallback(RATE_LIMIT_REASON, Some(Utc::now() + Duration::hours(1)));

        assert!(!state.refresh(Utc::now()));
        assert!(state.enabled);
    }

    #[test]
    fn refresh_without_cooldown_never_expires() {
        let mut state = FallbackState::default();
        state.enter_fallback("budget-exhausted", None);

        assert!(!state.refresh(Utc::now() + Duration::days(30)));
        assert!(state.enabled);
    }

    #[test]
    fn task_lifecycle_success() {
        let mut state = FallbackState::default();
        state.begin_task(TaskRecord::new("t1", "summarize the log", "text", "fast-inference"));
        assert_eq!(state.active_tasks.len(), 1);

        state.finish_task("t1", "fast-inference", true);
        assert!(state.active_tasks.is_empty());
        assert_eq!(state.completed_tasks.len(), 1);
        assert!(state.completed_tasks[0].success);
    }

    #[test]
    fn aborted_attempt_leaves_no_completion() {
        let mut state = FallbackState::default();
        state.begin_task(TaskRecord::new("t1", "task", "text", "agent-cli"));
        state.abort_task("t1");
        assert!(state.active_tasks.is_empty());
        assert!(state.completed_tasks.is_empty());
    }

    #[test]
    fn begin_task_replaces_stale_record() {
        let mut state = FallbackState::default();
        state.begin_task(TaskRecord::new("t1", "task", "text", "agent-cli"));
        state.begin_task(TaskRecord::new("t1", "task", "text", "fast-inference"));
        assert_eq!(state.active_tasks.len(), 1);
        assert_eq!(state.active_tasks[0].backend, "fast-inference");
    }
}
