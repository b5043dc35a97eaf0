//! Outcomes command handlers: the reporting surface.

use crate::cli::{load_config, output, OutcomesListArgs, OutcomesMarkArgs};
use crate::store::ResultStore;

/// Handle `switchyard outcomes list`.
pub async fn handle_outcomes_list(
    args: &OutcomesListArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let store = ResultStore::open(config.storage.outcomes_dir()).await?;

    let outcomes = if args.unreported {
        store.list_unreported().await?
    } else {
        store.list_all().await?
    };

    if args.json {
        println!("{}", output::format_outcomes_json(&outcomes));
    } else {
        println!("{}", output::format_outcomes_table(&outcomes));
    }

    Ok(())
}

/// Handle `switchyard outcomes mark-reported`.
pub async fn handle_outcomes_mark(
    args: &OutcomesMarkArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let store = ResultStore::open(config.storage.outcomes_dir()).await?;

    store.mark_reported(&args.id).await?;
    println!("Outcome {} marked as reported", args.id);
    Ok(())
}
