//! Mock ports shared by the core test modules.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cinechat_types::backend::BackendSnapshot;
use cinechat_types::error::{AiError, SearchError};
use cinechat_types::item::ItemRef;
use tokio::sync::{watch, Barrier};

use crate::ai::AiBackend;
use crate::availability::BackendAvailability;
use crate::search::SearchBackend;

/// How `MockAi::generate_reply` answers.
#[derive(Clone)]
pub enum ReplyScript {
    /// "answer: {query}"
    Echo,
    Fixed(String),
    Fail(AiError),
    /// Never completes.
    Hang,
}

/// Increments a shared counter when dropped; used to prove that in-flight
/// backend futures were torn down.
pub struct DropCounter(pub Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockAi {
    pub name: String,
    pub reply: ReplyScript,
    pub terms: Result<Vec<String>, AiError>,
    pub hang_terms: bool,
    /// Extra latency per query text, applied to both calls.
    pub delays: HashMap<String, Duration>,
    /// When set, both calls rendezvous here before answering.
    pub barrier: Option<Arc<Barrier>>,
    pub reply_calls: Arc<AtomicUsize>,
    pub terms_calls: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicUsize>,
}

impl MockAi {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: ReplyScript::Echo,
            terms: Ok(Vec::new()),
            hang_terms: false,
            delays: HashMap::new(),
            barrier: None,
            reply_calls: Arc::new(AtomicUsize::new(0)),
            terms_calls: Arc::new(AtomicUsize::new(0)),
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_reply(mut self, reply: ReplyScript) -> Self {
        self.reply = reply;
        self
    }

    pub fn with_terms(mut self, terms: Result<Vec<String>, AiError>) -> Self {
        self.terms = terms;
        self
    }

    pub fn with_hanging_terms(mut self) -> Self {
        self.hang_terms = true;
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    async fn pace(&self, query: &str) {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
    }
}

impl AiBackend for MockAi {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_reply(&self, query: &str) -> Result<String, AiError> {
        self.reply_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = DropCounter(Arc::clone(&self.dropped));
        self.pace(query).await;
        match &self.reply {
            ReplyScript::Echo => Ok(format!("answer: {query}")),
            ReplyScript::Fixed(text) => Ok(text.clone()),
            ReplyScript::Fail(err) => Err(err.clone()),
            ReplyScript::Hang => std::future::pending().await,
        }
    }

    async fn extract_search_terms(&self, query: &str) -> Result<Vec<String>, AiError> {
        self.terms_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = DropCounter(Arc::clone(&self.dropped));
        self.pace(query).await;
        if self.hang_terms {
            std::future::pending::<()>().await;
        }
        self.terms.clone()
    }
}

pub struct MockSearch {
    pub result: Result<Vec<ItemRef>, SearchError>,
    pub delay: Option<Duration>,
    pub calls: Arc<AtomicUsize>,
    pub terms: Arc<Mutex<Vec<String>>>,
}

impl MockSearch {
    pub fn returning(items: Vec<ItemRef>) -> Self {
        Self {
            result: Ok(items),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            terms: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(err: SearchError) -> Self {
        Self {
            result: Err(err),
            ..Self::returning(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl SearchBackend for MockSearch {
    fn name(&self) -> &str {
        "mock-search"
    }

    async fn search(&self, term: &str) -> Result<Vec<ItemRef>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.terms.lock().unwrap().push(term.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// `n` items with ids "item-0".."item-{n-1}".
pub fn items(n: usize) -> Vec<ItemRef> {
    (0..n)
        .map(|i| ItemRef::new(format!("item-{i}"), format!("Title {i}")))
        .collect()
}

pub struct MockAvailability {
    pub tx: watch::Sender<BackendSnapshot>,
    pub retries: AtomicUsize,
}

impl MockAvailability {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(BackendSnapshot::default());
        Self {
            tx,
            retries: AtomicUsize::new(0),
        }
    }

    pub fn publish(&self, snapshot: BackendSnapshot) {
        self.tx.send_replace(snapshot);
    }
}

impl BackendAvailability for MockAvailability {
    fn snapshots(&self) -> watch::Receiver<BackendSnapshot> {
        self.tx.subscribe()
    }

    fn retry_download(&self) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }
}
