//! BoxAiBackend -- object-safe dynamic dispatch wrapper for AiBackend.
//!
//! 1. `AiBackendDyn` is an object-safe mirror of `AiBackend` with boxed futures
//! 2. Blanket impl of `AiBackendDyn` for all `T: AiBackend`
//! 3. `BoxAiBackend` wraps `Box<dyn AiBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use cinechat_types::error::AiError;

use super::backend::AiBackend;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`AiBackend`] with boxed futures.
pub trait AiBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_reply_boxed<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, AiError>>;

    fn extract_search_terms_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, AiError>>;

    fn retry_download(&self);
}

impl<T: AiBackend> AiBackendDyn for T {
    fn name(&self) -> &str {
        AiBackend::name(self)
    }

    fn generate_reply_boxed<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
        Box::pin(self.generate_reply(query))
    }

    fn extract_search_terms_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, AiError>> {
        Box::pin(self.extract_search_terms(query))
    }

    fn retry_download(&self) {
        AiBackend::retry_download(self)
    }
}

/// Type-erased AI backend for runtime backend selection.
///
/// `AiBackend` uses RPITIT and cannot be a trait object directly, so this
/// wrapper exposes the same methods over an `AiBackendDyn` trait object.
pub struct BoxAiBackend {
    inner: Box<dyn AiBackendDyn + Send + Sync>,
}

impl BoxAiBackend {
    /// Wrap a concrete `AiBackend` in a type-erased box.
    pub fn new<T: AiBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate_reply(&self, query: &str) -> Result<String, AiError> {
        self.inner.generate_reply_boxed(query).await
    }

    pub async fn extract_search_terms(&self, query: &str) -> Result<Vec<String>, AiError> {
        self.inner.extract_search_terms_boxed(query).await
    }

    pub fn retry_download(&self) {
        self.inner.retry_download()
    }
}

impl std::fmt::Debug for BoxAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxAiBackend")
            .field("name", &self.name())
            .finish()
    }
}
