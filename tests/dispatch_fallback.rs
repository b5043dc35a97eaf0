//! Integration tests for the dispatch loop and fallback state machine.

mod common;

use chrono::{Duration, Utc};
use common::{build_dispatcher, uniform_executors, MockExecutor, Scripted};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use switchyard::dispatch::{DispatchOptions, DispatchStatus};
use switchyard::executor::ExecutionBackend;
use switchyard::routing::RoutePreferences;

fn call_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[tokio::test]
async fn react_task_routes_to_agent_cli_and_completes() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    let report = dispatcher
        .dispatch(
            "generate a React dashboard component",
            DispatchOptions::default(),
        )
        .await
        .unwrap();

    assert!(report.routed);
    assert!(report.success());
    assert_eq!(report.decision.backend, "agent-cli");
    match &report.status {
        DispatchStatus::Completed { backend, content, .. } => {
            assert_eq!(backend, "agent-cli");
            assert_eq!(content, "agent-cli result");
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(*calls.lock().unwrap(), vec!["agent-cli"]);
}

#[tokio::test]
async fn failed_primary_retries_top_alternate_once() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();

    let mut executors: HashMap<String, Arc<dyn ExecutionBackend>> = HashMap::new();
    executors.insert(
        "agent-cli".to_string(),
        Arc::new(MockExecutor::always_fails("agent-cli", Arc::clone(&calls))),
    );
    executors.insert(
        "reasoning-api".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "reasoning-api",
            Arc::clone(&calls),
        )),
    );
    executors.insert(
        "fast-inference".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "fast-inference",
            Arc::clone(&calls),
        )),
    );

    let dispatcher = build_dispatcher(dir.path(), executors).await;
    let report = dispatcher
        .dispatch(
            "generate a React dashboard component",
            DispatchOptions::default(),
        )
        .await
        .unwrap();

    assert!(report.success());
    // Exactly one retry against the top alternate; no further attempts.
    assert_eq!(*calls.lock().unwrap(), vec!["agent-cli", "reasoning-api"]);
}

#[tokio::test]
async fn exhausted_chain_returns_structured_failure() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_fails)).await;

    let report = dispatcher
        .dispatch(
            "generate a React dashboard component",
            DispatchOptions::default(),
        )
        .await
        .unwrap();

    assert!(report.routed);
    assert!(!report.success());
    match &report.status {
        DispatchStatus::Exhausted { attempts } => {
            // Bounded: one attempt per distinct backend, no repeats.
            assert_eq!(attempts.len(), 3);
            for attempt in attempts {
                assert!(attempt.error.contains("simulated failure"));
            }
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
    assert_eq!(calls.lock().unwrap().len(), 3);

    // The failure was still recorded durably.
    let unreported = dispatcher.results().list_unreported().await.unwrap();
    assert_eq!(unreported.len(), 1);
    assert!(!unreported[0].success);
}

#[tokio::test]
async fn rate_limit_error_triggers_fallback_transition() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();

    let mut executors: HashMap<String, Arc<dyn ExecutionBackend>> = HashMap::new();
    executors.insert(
        "agent-cli".to_string(),
        Arc::new(MockExecutor::new(
            "agent-cli",
            vec![Scripted::RateLimit],
            Scripted::Succeed("late".into()),
            Arc::clone(&calls),
        )),
    );
    executors.insert(
        "reasoning-api".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "reasoning-api",
            Arc::clone(&calls),
        )),
    );
    executors.insert(
        "fast-inference".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "fast-inference",
            Arc::clone(&calls),
        )),
    );

    let dispatcher = build_dispatcher(dir.path(), executors).await;
    let before = Utc::now();
    let report = dispatcher
        .dispatch("refactor the payment module", DispatchOptions::default())
        .await
        .unwrap();

    // The chain still produced a result...
    assert!(report.success());

    // ...and the dispatcher itself entered fallback with the default cooldown.
    let status = dispatcher.status().await.unwrap();
    assert!(status.fallback_enabled);
    assert_eq!(status.fallback_reason.as_deref(), Some("rate-limit"));
    let until = status.rate_limit_until.unwrap();
    let expected = before + Duration::hours(1);
    assert!((until - expected).num_seconds().abs() < 60);
}

#[tokio::test]
async fn blocked_task_performs_zero_execution_calls() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    dispatcher.report_rate_limit(None).await.unwrap();

    let report = dispatcher
        .dispatch(
            "remember my formatting preferences for the next session",
            DispatchOptions::default(),
        )
        .await
        .unwrap();

    assert!(!report.routed);
    assert!(matches!(report.status, DispatchStatus::Blocked { .. }));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_primary_tasks_still_route_during_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    dispatcher.report_rate_limit(None).await.unwrap();

    let report = dispatcher
        .dispatch("quick summary of the changelog", DispatchOptions::default())
        .await
        .unwrap();

    assert!(report.routed);
    assert!(report.success());
}

#[tokio::test]
async fn report_rate_limit_defaults_to_one_hour_cooldown() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    let before = Utc::now();
    dispatcher.report_rate_limit(None).await.unwrap();

    let status = dispatcher.status().await.unwrap();
    assert!(status.fallback_enabled);
    let until = status.rate_limit_until.unwrap();
    let expected = before + Duration::hours(1);
    assert!((until - expected).num_seconds().abs() < 60);
}

#[tokio::test]
async fn past_cooldown_expires_lazily_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    dispatcher
        .report_rate_limit(Some(Utc::now() - Duration::minutes(5)))
        .await
        .unwrap();

    // No explicit clear: the next read observes NORMAL.
    let status = dispatcher.status().await.unwrap();
    assert!(!status.fallback_enabled);
    assert!(status.rate_limit_until.is_none());
}

#[tokio::test]
async fn clear_fallback_restores_normal_mode() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    dispatcher.report_rate_limit(None).await.unwrap();
    dispatcher.clear_fallback().await.unwrap();

    let status = dispatcher.status().await.unwrap();
    assert!(!status.fallback_enabled);
    assert!(status.fallback_reason.is_none());
}

#[tokio::test]
async fn forced_backend_is_dispatched_first() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    let report = dispatcher
        .dispatch(
            "generate a React dashboard component",
            DispatchOptions {
                preferences: RoutePreferences {
                    force_backend: Some("fast-inference".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(report.decision.backend, "fast-inference");
    assert_eq!(report.decision.confidence, 1.0);
    assert_eq!(*calls.lock().unwrap(), vec!["fast-inference"]);
}

#[tokio::test]
async fn forced_backend_still_falls_back_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();

    let mut executors: HashMap<String, Arc<dyn ExecutionBackend>> = HashMap::new();
    executors.insert(
        "fast-inference".to_string(),
        Arc::new(MockExecutor::always_fails(
            "fast-inference",
            Arc::clone(&calls),
        )),
    );
    executors.insert(
        "agent-cli".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "agent-cli",
            Arc::clone(&calls),
        )),
    );
    executors.insert(
        "reasoning-api".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "reasoning-api",
            Arc::clone(&calls),
        )),
    );

    let dispatcher = build_dispatcher(dir.path(), executors).await;
    let report = dispatcher
        .dispatch(
            "anything at all",
            DispatchOptions {
                preferences: RoutePreferences {
                    force_backend: Some("fast-inference".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Forced choice has no alternates; the fixed secondary order still
    // guarantees somewhere to go.
    assert!(report.success());
    let log = calls.lock().unwrap();
    assert_eq!(log[0], "fast-inference");
    assert_eq!(log[1], "agent-cli");
}

#[tokio::test]
async fn missing_executor_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();

    // Only one backend has an executor at all.
    let mut executors: HashMap<String, Arc<dyn ExecutionBackend>> = HashMap::new();
    executors.insert(
        "fast-inference".to_string(),
        Arc::new(MockExecutor::always_succeeds(
            "fast-inference",
            Arc::clone(&calls),
        )),
    );

    let dispatcher = build_dispatcher(dir.path(), executors).await;
    let report = dispatcher
        .dispatch(
            "generate a React dashboard component",
            DispatchOptions::default(),
        )
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(*calls.lock().unwrap(), vec!["fast-inference"]);
}

#[tokio::test]
async fn completed_tasks_are_logged_in_state() {
    let dir = tempfile::tempdir().unwrap();
    let calls = call_log();
    let dispatcher =
        build_dispatcher(dir.path(), uniform_executors(&calls, MockExecutor::always_succeeds))
            .await;

    dispatcher
        .dispatch("summarize the incident report", DispatchOptions::default())
        .await
        .unwrap();

    let status = dispatcher.status().await.unwrap();
    assert_eq!(status.active_tasks, 0);
    assert_eq!(status.completed_tasks, 1);
    assert_eq!(status.unreported_outcomes, 1);
}
