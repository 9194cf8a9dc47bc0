//! Atomically published conversation state.
//!
//! `StateStore` wraps a `tokio::sync::watch` channel. Every mutation goes
//! through `send_modify`, which holds the channel's write lock for the whole
//! read-derive-publish step, so receivers only ever see complete snapshots.
//! Query pipelines and the backend mirror share this single update path.

use std::sync::Arc;

use cinechat_types::backend::BackendSnapshot;
use cinechat_types::conversation::Message;
use cinechat_types::state::ConversationState;
use tokio::sync::watch;

#[derive(Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ConversationState>>,
}

impl StateStore {
    pub fn new(initial: ConversationState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Receiver positioned at the current state.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.tx.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> ConversationState {
        self.tx.borrow().clone()
    }

    /// Apply one atomic update.
    pub fn update(&self, f: impl FnOnce(&mut ConversationState)) {
        self.tx.send_modify(f);
    }

    /// Append the user message and mark a pipeline as in flight.
    ///
    /// The returned guard must be finished with the resulting assistant
    /// message; dropping it unfinished releases the in-flight slot without
    /// appending anything.
    pub fn begin_query(&self, message: Message) -> InFlight {
        self.update(|state| state.begin_query(message));
        InFlight {
            store: self.clone(),
            finished: false,
        }
    }

    /// Copy a backend snapshot into the mirrored fields. History is untouched.
    pub fn mirror_backend(&self, snapshot: BackendSnapshot) {
        self.tx.send_if_modified(|state| {
            if state.backend == snapshot {
                return false;
            }
            state.backend = snapshot;
            true
        });
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("receiver_count", &self.tx.receiver_count())
            .finish()
    }
}

/// One in-flight query pipeline.
#[must_use = "dropping an InFlight releases the query without a reply"]
pub struct InFlight {
    store: StateStore,
    finished: bool,
}

impl InFlight {
    /// Append the assistant message and release the pipeline in one update.
    pub fn finish(mut self, message: Message) {
        self.finished = true;
        self.store.update(|state| state.complete_query(message));
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.finished {
            self.store.update(|state| state.release_query());
        }
    }
}
