//! Conversation orchestrator.
//!
//! For each query the orchestrator appends the user message, fans out the
//! two AI calls (reply generation and keyword extraction) as concurrent
//! tasks in a `JoinSet`, joins both, runs the dependent search with the
//! combined keywords, and appends exactly one assistant message. A separate
//! long-lived task mirrors backend availability snapshots into the same
//! published state.
//!
//! Overlapping queries are not serialised: each one runs its own pipeline,
//! so assistant replies can land in a different order than their user
//! messages. Callers that need strict pairing should hold off on new
//! submissions while `is_loading` is true.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cinechat_types::config::ConversationConfig;
use cinechat_types::conversation::Message;
use cinechat_types::error::{AiError, ConversationError, SearchError};
use cinechat_types::item::ItemRef;
use cinechat_types::state::ConversationState;
use futures_util::Stream;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, warn, Instrument};

use super::store::{InFlight, StateStore};
use super::terms::combine_search_terms;
use crate::ai::BoxAiBackend;
use crate::availability::BackendAvailability;
use crate::search::BoxSearchBackend;

/// Result of one branch of the fan-out.
enum Branch {
    Reply(Result<String, AiError>),
    Terms(Result<Vec<String>, AiError>),
}

struct Shared {
    ai: BoxAiBackend,
    search: BoxSearchBackend,
    availability: Arc<dyn BackendAvailability>,
    store: StateStore,
    config: ConversationConfig,
}

impl Shared {
    /// Drive one admitted query to its single assistant message.
    async fn complete(
        self: Arc<Self>,
        query: String,
        in_flight: InFlight,
        cancel: CancellationToken,
    ) -> Result<Message, ConversationError> {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ConversationError::Cancelled),
            outcome = self.answer(&query) => outcome,
        };

        match outcome {
            Ok(reply) => {
                info!(items = reply.recommended_items.len(), "query answered");
                in_flight.finish(reply.clone());
                Ok(reply)
            }
            Err(ConversationError::Generation(err)) => {
                warn!(error = %err, "generation failed");
                let text = format!("{}: {err}", self.config.error_reply_prefix);
                in_flight.finish(Message::assistant_error(text));
                Err(ConversationError::Generation(err))
            }
            Err(other) => {
                // `in_flight` drops here: the slot is released, nothing appended.
                info!(reason = %other, "query abandoned");
                Err(other)
            }
        }
    }

    async fn answer(self: &Arc<Self>, query: &str) -> Result<Message, ConversationError> {
        let (reply, terms) = self.fan_out(query).await?;
        let items = self.recommend(&terms).await;
        Ok(Message::assistant(reply, items))
    }

    /// Run reply generation and keyword extraction concurrently and join.
    ///
    /// The first failure wins; returning drops the `JoinSet`, which aborts
    /// whichever branch is still running.
    async fn fan_out(self: &Arc<Self>, query: &str) -> Result<(String, Vec<String>), ConversationError> {
        let limit = self.config.generation_timeout_ms.map(Duration::from_millis);
        let mut set = JoinSet::new();

        let shared = Arc::clone(self);
        let q = query.to_string();
        set.spawn(
            async move { Branch::Reply(with_timeout(limit, shared.ai.generate_reply(&q)).await) }
                .in_current_span(),
        );

        let shared = Arc::clone(self);
        let q = query.to_string();
        set.spawn(
            async move {
                Branch::Terms(with_timeout(limit, shared.ai.extract_search_terms(&q)).await)
            }
            .in_current_span(),
        );

        let mut reply = None;
        let mut terms = None;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Branch::Reply(Ok(text))) => reply = Some(text),
                Ok(Branch::Terms(Ok(keywords))) => terms = Some(keywords),
                Ok(Branch::Reply(Err(err))) | Ok(Branch::Terms(Err(err))) => {
                    return Err(ConversationError::Generation(err));
                }
                Err(join_err) if join_err.is_cancelled() => {
                    return Err(ConversationError::Cancelled);
                }
                Err(join_err) => {
                    return Err(ConversationError::Generation(AiError::Provider {
                        message: format!("AI task failed: {join_err}"),
                    }));
                }
            }
        }

        match (reply, terms) {
            (Some(reply), Some(terms)) => {
                debug!(keywords = terms.len(), "fan-out joined");
                Ok((reply, terms))
            }
            _ => Err(ConversationError::Cancelled),
        }
    }

    /// Best-effort recommendations: errors, timeouts and "no keywords" all
    /// yield an empty list.
    async fn recommend(&self, terms: &[String]) -> Vec<ItemRef> {
        let Some(term) = combine_search_terms(terms) else {
            debug!("no search intent, skipping search");
            return Vec::new();
        };

        let search = self.search.search(&term);
        let result = match self.config.search_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), search)
                .await
                .unwrap_or(Err(SearchError::Timeout { after_ms: ms })),
            None => search.await,
        };

        match result {
            Ok(mut items) => {
                items.truncate(self.config.recommendation_limit());
                items
            }
            Err(err) => {
                warn!(error = %err, term = %term, "search degraded to no results");
                Vec::new()
            }
        }
    }
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    call: impl Future<Output = Result<T, AiError>>,
) -> Result<T, AiError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or(Err(AiError::Timeout {
            after_ms: limit.as_millis() as u64,
        })),
        None => call.await,
    }
}

/// Owns one conversation: its history, its in-flight pipelines and the
/// backend-availability mirror.
///
/// Must be created inside a Tokio runtime. Dropping the orchestrator cancels
/// every in-flight pipeline and the mirror; use [`shutdown`](Self::shutdown)
/// to also wait for them to unwind.
pub struct ConversationOrchestrator {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl ConversationOrchestrator {
    pub fn new(
        ai: BoxAiBackend,
        search: BoxSearchBackend,
        availability: Arc<dyn BackendAvailability>,
        config: ConversationConfig,
    ) -> Self {
        let initial = ConversationState::with_backend(availability.current());
        let orchestrator = Self {
            shared: Arc::new(Shared {
                ai,
                search,
                availability,
                store: StateStore::new(initial),
                config,
            }),
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        };
        orchestrator.spawn_backend_mirror();
        orchestrator
    }

    /// Submit a query without waiting for the answer.
    ///
    /// The user message is appended before this returns; the assistant
    /// message follows through the published state. Returns `false` when the
    /// query is blank or the orchestrator is shut down.
    pub fn send_message(&self, query: impl Into<String>) -> bool {
        let (query, in_flight) = match self.admit(query.into()) {
            Ok(admitted) => admitted,
            Err(err) => {
                debug!(reason = %err, "query not admitted");
                return false;
            }
        };

        let span = info_span!("query", len = query.len());
        let shared = Arc::clone(&self.shared);
        let cancel = self.cancel.clone();
        self.tracker.spawn(
            async move {
                // Outcome is published through state and already logged.
                let _ = shared.complete(query, in_flight, cancel).await;
            }
            .instrument(span),
        );
        true
    }

    /// Submit a query and wait for its assistant message.
    ///
    /// On `Err(Generation)` the error reply has already been appended. On
    /// `Err(Cancelled)` nothing beyond the user message was appended.
    pub async fn ask(&self, query: impl Into<String>) -> Result<Message, ConversationError> {
        let (query, in_flight) = self.admit(query.into())?;
        let span = info_span!("query", len = query.len());
        Arc::clone(&self.shared)
            .complete(query, in_flight, self.cancel.clone())
            .instrument(span)
            .await
    }

    /// Forward a download retry to the availability component.
    ///
    /// Never touches conversation history; the effect shows up in the next
    /// mirrored backend snapshot.
    pub fn retry_download(&self) {
        info!("retrying on-device model download");
        self.shared.availability.retry_download();
    }

    /// Current state.
    pub fn state(&self) -> ConversationState {
        self.shared.store.snapshot()
    }

    /// Raw watch receiver positioned at the current state.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.shared.store.subscribe()
    }

    /// Current state followed by every subsequent state (latest-wins).
    pub fn observe_state(&self) -> impl Stream<Item = ConversationState> + Send + 'static {
        let mut rx = self.shared.store.subscribe();
        async_stream::stream! {
            let current = rx.borrow_and_update().clone();
            yield current;
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                yield next;
            }
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel in-flight pipelines and the backend mirror, then wait for them.
    pub async fn shutdown(&self) {
        info!(in_flight = self.tracker.len(), "shutting down conversation");
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    fn admit(&self, query: String) -> Result<(String, InFlight), ConversationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ConversationError::EmptyQuery);
        }
        if self.cancel.is_cancelled() {
            return Err(ConversationError::ShutDown);
        }
        let in_flight = self.shared.store.begin_query(Message::user(query));
        Ok((query.to_string(), in_flight))
    }

    fn spawn_backend_mirror(&self) {
        let mut snapshots = self.shared.availability.snapshots();
        let store = self.shared.store.clone();
        let cancel = self.cancel.clone();

        self.tracker.spawn(async move {
            loop {
                let snapshot = snapshots.borrow_and_update().clone();
                debug!(status = %snapshot.status_text, "mirroring backend snapshot");
                store.mirror_backend(snapshot);

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            debug!("backend availability closed, mirror stopping");
                            break;
                        }
                    }
                }
            }
        });
    }
}

impl Drop for ConversationOrchestrator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for ConversationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationOrchestrator")
            .field("ai", &self.shared.ai)
            .field("search", &self.shared.search)
            .field("in_flight", &self.tracker.len())
            .field("shut_down", &self.cancel.is_cancelled())
            .finish()
    }
}
