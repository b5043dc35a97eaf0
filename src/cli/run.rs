//! Run command implementation.

use crate::classify::RegexClassifier;
use crate::cli::{load_config, output, RunArgs};
use crate::config::OrchestratorConfig;
use crate::dispatch::{DispatchOptions, DispatchStatus, Dispatcher};
use crate::executor::build_executors;
use crate::fallback::{SharedState, StateStore};
use crate::registry::Registry;
use crate::routing::{RoutePreferences, Scorer};
use crate::store::ResultStore;
use std::sync::Arc;
use std::time::Duration;

/// Assemble a dispatcher from configuration.
pub async fn build_dispatcher(
    config: &OrchestratorConfig,
) -> Result<Dispatcher, Box<dyn std::error::Error>> {
    let registry = Arc::new(Registry::from_specs(
        config.backends.iter().map(|b| b.to_spec()).collect(),
    )?);
    let classifier = Arc::new(RegexClassifier::with_default_patterns()?);
    let scorer = Scorer::new(
        config.routing.confidence_divisor,
        config.routing.default_backend.clone(),
    );
    let executors = build_executors(&config.backends)?;
    let state = SharedState::load(StateStore::new(config.storage.state_path())).await?;
    let results = ResultStore::open(config.storage.outcomes_dir()).await?;

    Ok(Dispatcher::new(
        registry,
        classifier,
        scorer,
        executors,
        state,
        results,
        config.dispatch.default_timeout(),
        Duration::from_secs(config.dispatch.rate_limit_cooldown_secs),
    ))
}

/// Handle `switchyard run`.
pub async fn handle_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    crate::logging::init_tracing(&config.logging)?;

    if config.logging.log_task_content {
        tracing::info!(task = %args.task, "dispatching task");
    }

    let dispatcher = build_dispatcher(&config).await?;

    let options = DispatchOptions {
        task_id: args.task_id.clone(),
        preferences: RoutePreferences {
            force_backend: args.backend.clone(),
            prefer_cost: args.prefer_cost,
            prefer_speed: args.prefer_speed,
            prefer_quality: args.prefer_quality,
        },
        mode: args.mode.parse()?,
        working_context: args.context.clone(),
        timeout: args.timeout_secs.map(Duration::from_secs),
    };

    let report = dispatcher.dispatch(&args.task, options).await?;

    if args.json {
        println!("{}", output::format_report_json(&report));
    } else {
        println!("{}", output::format_report(&report));
    }

    // Chain exhaustion is an error exit; a policy block is not.
    if let DispatchStatus::Exhausted { .. } = report.status {
        return Err("all backends in the fallback chain failed".into());
    }
    Ok(())
}
