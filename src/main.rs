use clap::Parser;
use switchyard::cli::{
    fallback, handle_completions, handle_config_init, outcomes, route, run, status, Cli, Commands,
    ConfigCommands, FallbackCommands, OutcomesCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run::handle_run(&args).await,
        Commands::Route(args) => route::handle_route(&args),
        Commands::Status(args) => status::handle_status(&args).await,
        Commands::Fallback(cmd) => match cmd {
            FallbackCommands::Enter(args) => fallback::handle_fallback_enter(&args).await,
            FallbackCommands::Clear(args) => fallback::handle_fallback_clear(&args).await,
        },
        Commands::Outcomes(cmd) => match cmd {
            OutcomesCommands::List(args) => outcomes::handle_outcomes_list(&args).await,
            OutcomesCommands::MarkReported(args) => outcomes::handle_outcomes_mark(&args).await,
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
