//! Fallback command handlers: explicit enter/clear signals.

use crate::cli::{load_config, FallbackClearArgs, FallbackEnterArgs};
use crate::fallback::{SharedState, StateStore};
use chrono::{DateTime, Duration, Utc};

/// Handle `switchyard fallback enter`.
pub async fn handle_fallback_enter(
    args: &FallbackEnterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;

    let until: Option<DateTime<Utc>> = match (&args.until, args.cooldown_mins) {
        (Some(raw), _) => Some(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc)),
        (None, Some(mins)) => Some(Utc::now() + Duration::minutes(mins)),
        (None, None) => {
            Some(Utc::now() + Duration::seconds(config.dispatch.rate_limit_cooldown_secs as i64))
        }
    };

    let state = SharedState::load(StateStore::new(config.storage.state_path())).await?;
    state
        .mutate(|s| s.enter_fallback(&args.reason, until))
        .await?;

    match until {
        Some(t) => println!(
            "Fallback mode active (reason: {}) until {}",
            args.reason,
            t.to_rfc3339()
        ),
        None => println!("Fallback mode active (reason: {})", args.reason),
    }
    Ok(())
}

/// Handle `switchyard fallback clear`.
pub async fn handle_fallback_clear(
    args: &FallbackClearArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;

    let state = SharedState::load(StateStore::new(config.storage.state_path())).await?;
    state.mutate(|s| s.clear()).await?;

    println!("Fallback mode cleared; routing restored to normal");
    Ok(())
}
