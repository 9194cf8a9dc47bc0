//! Terminal rendering of conversation state.
//!
//! `RenderCursor` remembers how much of the published state has already been
//! printed, so each new snapshot yields only the lines for freshly appended
//! assistant messages and backend status changes.

use std::io::Write;

use cinechat_types::backend::BackendSnapshot;
use cinechat_types::conversation::Message;
use cinechat_types::state::ConversationState;
use console::style;
use futures_util::{Stream, StreamExt};

/// Styled lines for one assistant message and its recommendations.
pub fn format_reply(message: &Message) -> Vec<String> {
    let mut lines = Vec::new();
    if message.is_error {
        lines.push(format!("  {} {}", style("!").red().bold(), message.text));
        return lines;
    }

    lines.push(format!("  {} {}", style("cinechat >").cyan().bold(), message.text));
    for (i, item) in message.recommended_items.iter().enumerate() {
        lines.push(format!(
            "    {} {} {}",
            style(format!("{}.", i + 1)).dim(),
            item.title,
            style(format!("({})", item.id)).dim()
        ));
    }
    lines
}

pub fn format_backend(snapshot: &BackendSnapshot) -> String {
    let marker = if snapshot.using_on_device_model {
        style("●").green()
    } else if snapshot.is_downloading {
        style("●").yellow()
    } else {
        style("●").dim()
    };
    let mut line = format!("  {marker} {}", snapshot.status_text);
    if snapshot.can_retry_download {
        line.push_str(&format!(" {}", style("(/retry to try again)").dim()));
    }
    line
}

#[derive(Debug, Default)]
pub struct RenderCursor {
    shown_messages: usize,
    status: Option<BackendSnapshot>,
}

impl RenderCursor {
    /// Lines to print for whatever changed since the previous call.
    ///
    /// User messages are skipped: the input line already shows them.
    pub fn advance(&mut self, state: &ConversationState) -> Vec<String> {
        let mut lines = Vec::new();

        if self.status.as_ref() != Some(&state.backend) {
            lines.push(format_backend(&state.backend));
            self.status = Some(state.backend.clone());
        }

        let start = self.shown_messages.min(state.messages.len());
        for message in &state.messages[start..] {
            if message.is_assistant() {
                lines.extend(format_reply(message));
            }
        }
        self.shown_messages = state.messages.len();
        lines
    }
}

/// Print updates from `states` to `out` until the stream ends.
pub async fn follow_state(
    states: impl Stream<Item = ConversationState>,
    mut out: impl Write,
) {
    let mut cursor = RenderCursor::default();
    futures_util::pin_mut!(states);
    while let Some(state) = states.next().await {
        for line in cursor.advance(&state) {
            if writeln!(out, "{line}").is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cinechat_types::backend::BackendState;
    use cinechat_types::item::ItemRef;

    use super::*;

    fn plain(lines: &[String]) -> String {
        console::strip_ansi_codes(&lines.join("\n")).to_string()
    }

    #[test]
    fn reply_lists_numbered_items() {
        let message = Message::assistant(
            "Try these.",
            vec![ItemRef::new("m1", "Rififi"), ItemRef::new("m2", "Heat")],
        );
        let text = plain(&format_reply(&message));
        assert!(text.contains("Try these."));
        assert!(text.contains("1. Rififi (m1)"));
        assert!(text.contains("2. Heat (m2)"));
    }

    #[test]
    fn error_reply_has_no_items() {
        let text = plain(&format_reply(&Message::assistant_error("Sorry: boom")));
        assert!(text.contains("! Sorry: boom"));
    }

    #[test]
    fn backend_line_mentions_retry_when_possible() {
        let failed = BackendState::OnDeviceFailed { error_code: 2 }.snapshot(Some(2));
        assert!(plain(&[format_backend(&failed)]).contains("/retry"));
        let ready = BackendState::OnDeviceReady.snapshot(None);
        assert!(!plain(&[format_backend(&ready)]).contains("/retry"));
    }

    #[test]
    fn cursor_prints_only_new_assistant_messages_and_status_changes() {
        let mut cursor = RenderCursor::default();
        let mut state = ConversationState::default();

        // First call prints the initial status.
        assert_eq!(cursor.advance(&state).len(), 1);
        assert!(cursor.advance(&state).is_empty());

        state.begin_query(Message::user("noir"));
        assert!(cursor.advance(&state).is_empty());

        state.complete_query(Message::assistant("Here you go.", Vec::new()));
        let lines = cursor.advance(&state);
        assert_eq!(lines.len(), 1);
        assert!(plain(&lines).contains("Here you go."));

        state.backend = BackendState::Downloading { progress: Some(40) }.snapshot(None);
        let lines = cursor.advance(&state);
        assert_eq!(lines.len(), 1);
        assert!(plain(&lines).contains("40%"));
    }

    #[tokio::test]
    async fn follow_state_writes_each_update() {
        let mut first = ConversationState::default();
        first.begin_query(Message::user("q"));
        let mut second = first.clone();
        second.complete_query(Message::assistant("done", Vec::new()));

        let mut out = Vec::new();
        follow_state(futures_util::stream::iter(vec![first, second]), &mut out).await;

        let text = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        assert!(text.contains("AI backend status unknown"));
        assert!(text.contains("done"));
    }
}
