//! CLI command definitions for the `cinechat` binary.

pub mod ask;
pub mod chat;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with a movie and TV recommendation assistant.
#[derive(Parser)]
#[command(name = "cinechat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "CINECHAT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation.
    Chat,

    /// Ask a single question and print the answer.
    Ask {
        /// The question, e.g. "heist movies set in Paris".
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show the AI backend status.
    Status {
        /// Seconds to wait for the on-device check to settle.
        #[arg(long = "wait", default_value_t = 5)]
        wait_secs: u64,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
