//! Slash command parsing for the chat loop.

use std::io::{self, Write};

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Retry the on-device model download.
    Retry,
    /// Show the AI backend status.
    Status,
    Clear,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/retry" | "/download" => Some(ChatCommand::Retry),
        "/status" => Some(ChatCommand::Status),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (name, about) in [
        ("/help", "Show this help message"),
        ("/retry", "Retry the on-device model download"),
        ("/status", "Show which AI backend is in use"),
        ("/clear", "Clear the screen"),
        ("/quit", "End the chat session"),
    ] {
        writeln!(out, "  {:<10} {}", style(name).cyan(), about)?;
    }
    writeln!(out)
}
