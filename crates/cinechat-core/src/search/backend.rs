//! SearchBackend trait and its type-erased wrapper.

use std::future::Future;
use std::pin::Pin;

use cinechat_types::error::SearchError;
use cinechat_types::item::ItemRef;

/// Keyword lookup over a media catalog.
///
/// Implementations return ranked items for one combined search string. The
/// conversation layer treats any error as "no results".
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &str;

    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<ItemRef>, SearchError>> + Send;
}

/// Object-safe version of [`SearchBackend`].
pub trait SearchBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn search_boxed<'a>(
        &'a self,
        term: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ItemRef>, SearchError>> + Send + 'a>>;
}

impl<T: SearchBackend> SearchBackendDyn for T {
    fn name(&self) -> &str {
        SearchBackend::name(self)
    }

    fn search_boxed<'a>(
        &'a self,
        term: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ItemRef>, SearchError>> + Send + 'a>> {
        Box::pin(self.search(term))
    }
}

/// Type-erased search backend.
pub struct BoxSearchBackend {
    inner: Box<dyn SearchBackendDyn + Send + Sync>,
}

impl BoxSearchBackend {
    pub fn new<T: SearchBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn search(&self, term: &str) -> Result<Vec<ItemRef>, SearchError> {
        self.inner.search_boxed(term).await
    }
}

impl std::fmt::Debug for BoxSearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxSearchBackend")
            .field("name", &self.name())
            .finish()
    }
}
