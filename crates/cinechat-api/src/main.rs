//! cinechat CLI entry point.
//!
//! Binary name: `cinechat`
//!
//! Parses CLI arguments, sets up tracing, wires the conversation services,
//! then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use cinechat_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter, TracingOptions};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(TracingOptions {
        default_filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: cli.json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "cinechat", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Ask { query } => cli::ask::ask(&state, &query, cli.json, cli.quiet).await,
        Commands::Status { wait_secs } => cli::status::status(&state, wait_secs, cli.json).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    state.shutdown().await;
    shutdown_tracing();
    result
}
