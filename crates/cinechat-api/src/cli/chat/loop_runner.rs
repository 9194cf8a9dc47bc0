//! Main chat loop orchestrating input, slash commands, and rendering.

use std::io::Write;

use anyhow::Context;
use console::style;
use rustyline_async::{Readline, ReadlineEvent};

use super::commands::{self, ChatCommand};
use super::renderer::{follow_state, format_backend};
use crate::state::AppState;

/// Run the interactive chat until `/quit`, Ctrl+D, or a closed stdin.
///
/// New questions are held back while a previous one is still being answered,
/// so every reply prints directly after its question.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    print_welcome_banner(state);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut rl, mut out) = Readline::new(prompt).context("Failed to initialize input")?;

    let renderer = tokio::spawn(follow_state(state.orchestrator.observe_state(), out.clone()));

    loop {
        let line = match rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => line.trim().to_string(),
            Ok(ReadlineEvent::Interrupted) => {
                writeln!(out, "  {}", style("Press Ctrl+D to exit, or keep chatting.").dim())?;
                continue;
            }
            Ok(ReadlineEvent::Eof) | Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line.clone());

        if let Some(cmd) = commands::parse(&line) {
            match cmd {
                ChatCommand::Help => commands::print_help(&mut out)?,
                ChatCommand::Retry => {
                    state.orchestrator.retry_download();
                    writeln!(out, "  {}", style("Retrying on-device model download...").dim())?;
                }
                ChatCommand::Status => {
                    writeln!(out, "{}", format_backend(&state.orchestrator.state().backend))?;
                }
                ChatCommand::Clear => rl.clear()?,
                ChatCommand::Exit => break,
                ChatCommand::Unknown(name) => writeln!(
                    out,
                    "  {} Unknown command: {}. Type /help for available commands.",
                    style("?").yellow().bold(),
                    style(name).dim()
                )?,
            }
            continue;
        }

        if state.orchestrator.state().is_loading {
            writeln!(
                out,
                "  {}",
                style("Still working on your last question, try again in a moment.").dim()
            )?;
            continue;
        }

        state.orchestrator.send_message(line);
    }

    rl.flush()?;
    renderer.abort();
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

fn print_welcome_banner(state: &AppState) {
    println!();
    println!("  {} {}", style("🎬").bold(), style("cinechat").cyan().bold());
    println!(
        "  {}",
        style("Ask for movies and shows by genre, mood, place or era.").dim()
    );
    if state.catalog_entries == 0 {
        println!(
            "  {} No catalog at {}; answers will have no recommendations.",
            style("!").yellow().bold(),
            style(state.catalog_path.display()).dim()
        );
    }
    println!("  {}", style("Type /help for commands.").dim());
    println!();
}
