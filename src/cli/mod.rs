//! CLI module for Switchyard.
//!
//! Command-line interface definitions and handlers for the task
//! orchestrator.
//!
//! # Commands
//!
//! - `run` - Classify, route, and execute a task
//! - `route` - Show the routing decision for a task without executing it
//! - `status` - Show orchestrator health (fallback state, task counts)
//! - `fallback` - Enter or clear fallback mode
//! - `outcomes` - List recorded task outcomes, acknowledge reported ones
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Execute a task with default routing
//! switchyard run "generate a React dashboard component"
//!
//! # Dry-run the routing decision
//! switchyard route "quick summary of the changelog" --prefer-speed
//!
//! # Report a rate limit observed out of band
//! switchyard fallback enter --reason rate-limit --cooldown-mins 60
//! ```

pub mod completions;
pub mod config;
pub mod fallback;
pub mod outcomes;
pub mod output;
pub mod route;
pub mod run;
pub mod status;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{ConfigError, OrchestratorConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Switchyard - Task Routing Orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "switchyard",
    version,
    about = "Task routing and fallback orchestrator for heterogeneous execution backends"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify, route, and execute a task
    Run(RunArgs),
    /// Show the routing decision without executing
    Route(RouteArgs),
    /// Show orchestrator health
    Status(StatusArgs),
    /// Enter or clear fallback mode
    #[command(subcommand)]
    Fallback(FallbackCommands),
    /// Inspect and acknowledge task outcomes
    #[command(subcommand)]
    Outcomes(OutcomesCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Task description
    pub task: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,

    /// Force routing to a specific backend (escape hatch)
    #[arg(long)]
    pub backend: Option<String>,

    /// Favor cheaper backends
    #[arg(long)]
    pub prefer_cost: bool,

    /// Favor faster backends
    #[arg(long)]
    pub prefer_speed: bool,

    /// Favor higher-quality backends
    #[arg(long)]
    pub prefer_quality: bool,

    /// Output format requested from the backend (text, json)
    #[arg(long, default_value = "text")]
    pub mode: String,

    /// Per-attempt timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Task identifier (generated when omitted)
    #[arg(long)]
    pub task_id: Option<String>,

    /// Working context prepended to the task
    #[arg(long)]
    pub context: Option<String>,

    /// Emit the dispatch report as JSON
    #[arg(long)]
    pub json: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SWITCHYARD_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Task description
    pub task: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,

    /// Force routing to a specific backend
    #[arg(long)]
    pub backend: Option<String>,

    /// Favor cheaper backends
    #[arg(long)]
    pub prefer_cost: bool,

    /// Favor faster backends
    #[arg(long)]
    pub prefer_speed: bool,

    /// Favor higher-quality backends
    #[arg(long)]
    pub prefer_quality: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum FallbackCommands {
    /// Enter fallback mode
    Enter(FallbackEnterArgs),
    /// Return to normal mode
    Clear(FallbackClearArgs),
}

#[derive(Args, Debug)]
pub struct FallbackEnterArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,

    /// Why fallback is being entered
    #[arg(long, default_value = "rate-limit")]
    pub reason: String,

    /// Explicit expiry (RFC 3339); overrides --cooldown-mins
    #[arg(long)]
    pub until: Option<String>,

    /// Cooldown window in minutes from now
    #[arg(long)]
    pub cooldown_mins: Option<i64>,
}

#[derive(Args, Debug)]
pub struct FallbackClearArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum OutcomesCommands {
    /// List recorded outcomes
    List(OutcomesListArgs),
    /// Mark an outcome as consumed by a reporter
    MarkReported(OutcomesMarkArgs),
}

#[derive(Args, Debug)]
pub struct OutcomesListArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,

    /// Only outcomes not yet reported
    #[arg(long)]
    pub unreported: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OutcomesMarkArgs {
    /// Task identifier of the outcome
    pub id: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "switchyard.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path
    #[arg(short, long, default_value = "switchyard.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration: the file if it exists, defaults otherwise, then
/// environment overrides and validation.
pub fn load_config(path: &Path) -> Result<OrchestratorConfig, ConfigError> {
    let config = if path.exists() {
        OrchestratorConfig::load(Some(path))?
    } else {
        OrchestratorConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
