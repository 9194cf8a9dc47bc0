//! One-shot question command.

use std::time::Duration;

use anyhow::Result;
use cinechat_types::error::ConversationError;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::chat::renderer::{format_backend, format_reply};
use crate::state::AppState;

/// Ask one question, wait for the full pipeline, and print the answer.
pub async fn ask(state: &AppState, words: &[String], json: bool, quiet: bool) -> Result<()> {
    let query = words.join(" ");

    let spinner = (!json && !quiet).then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });

    let result = state.orchestrator.ask(query.as_str()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let conversation = state.orchestrator.state();
    match result {
        Ok(reply) => {
            if json {
                let out = serde_json::json!({
                    "query": query,
                    "reply": reply.text,
                    "items": reply.recommended_items,
                    "backend": conversation.backend,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if !quiet {
                println!();
                for line in format_reply(&reply) {
                    println!("{line}");
                }
                println!();
                println!("{}", format_backend(&conversation.backend));
                println!();
            }
            Ok(())
        }
        Err(ConversationError::Generation(err)) => {
            if let (false, Some(message)) = (json, conversation.last_message()) {
                for line in format_reply(message) {
                    eprintln!("{line}");
                }
            }
            Err(ConversationError::Generation(err).into())
        }
        Err(err) => Err(err.into()),
    }
}
