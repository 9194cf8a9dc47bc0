//! The published conversation snapshot.

use serde::{Deserialize, Serialize};

use crate::backend::BackendSnapshot;
use crate::conversation::Message;

/// Complete observable state of one conversation at one instant.
///
/// Every mutation produces a whole new value through a single atomic update,
/// so observers never see a new message paired with a stale loading flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Append-only history in display order.
    pub messages: Vec<Message>,
    /// True while at least one query pipeline is in flight.
    pub is_loading: bool,
    /// Number of query pipelines currently in flight.
    #[serde(default)]
    pub pending_queries: usize,
    /// Mirrored AI backend availability.
    pub backend: BackendSnapshot,
}

impl ConversationState {
    /// Empty history with the given backend snapshot.
    pub fn with_backend(backend: BackendSnapshot) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user message and mark one more pipeline as in flight.
    pub fn begin_query(&mut self, message: Message) {
        self.messages.push(message);
        self.pending_queries += 1;
        self.is_loading = true;
    }

    /// Append the resulting assistant message and release one pipeline.
    pub fn complete_query(&mut self, message: Message) {
        self.messages.push(message);
        self.release_query();
    }

    /// Release one in-flight pipeline without appending anything.
    pub fn release_query(&mut self) {
        self.pending_queries = self.pending_queries.saturating_sub(1);
        self.is_loading = self.pending_queries > 0;
    }
}
