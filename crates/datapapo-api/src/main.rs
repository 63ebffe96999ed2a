//! Datapapo CLI and HTTP API entry point.
//!
//! Binary name: `papo`
//!
//! Parses CLI arguments, initializes tracing and application state, then
//! dispatches to the appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, SecretCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,datapapo=debug",
        _ => "trace",
    };

    if let Err(e) = datapapo_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "papo", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    datapapo_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Chat { file, model } => {
            let state = AppState::init(true).await?;
            cli::chat::loop_runner::run_chat_loop(&state, &file, model).await?;
        }

        Commands::Inspect { file } => {
            let state = AppState::init(false).await?;
            cli::dataset::inspect(&state, &file, cli.json)?;
        }

        Commands::Secret { action } => {
            let state = AppState::init(false).await?;
            match action {
                SecretCommand::Set { key, value } => {
                    cli::secret::set_secret(&state, &key, value.as_deref(), cli.json).await?;
                }
                SecretCommand::Show { key } => {
                    cli::secret::show_secret(&state, &key, cli.json).await?;
                }
                SecretCommand::Delete { key } => {
                    cli::secret::delete_secret(&state, &key, cli.json).await?;
                }
            }
        }

        Commands::Serve { host, port } => {
            let state = AppState::init(false).await?;
            http::serve(state, host, port).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}
