//! Status command: orchestrator health summary.

use crate::cli::{load_config, output, StatusArgs};
use crate::dispatch::StatusSummary;
use crate::fallback::{SharedState, StateStore};
use crate::store::ResultStore;

/// Handle `switchyard status`.
pub async fn handle_status(args: &StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;

    let state = SharedState::load(StateStore::new(config.storage.state_path())).await?;
    let results = ResultStore::open(config.storage.outcomes_dir()).await?;

    let summary = StatusSummary::collect(&state, &results).await?;

    if args.json {
        println!("{}", output::format_status_json(&summary));
    } else {
        println!("{}", output::format_status_table(&summary));
    }

    Ok(())
}
