//! AiBackend trait definition.

use std::future::Future;

use cinechat_types::error::AiError;

/// Trait for AI backends (on-device model, remote service, rule-based).
///
/// The two request methods are independent: they must be safe to call
/// concurrently, and neither may assume the other has already run.
pub trait AiBackend: Send + Sync {
    /// Human-readable backend name (e.g., "on-device", "remote").
    fn name(&self) -> &str;

    /// Produce a natural-language answer to the query.
    fn generate_reply(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<String, AiError>> + Send;

    /// Distil zero or more search keywords from the query.
    ///
    /// An empty result is valid and means "no actionable search intent".
    fn extract_search_terms(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, AiError>> + Send;

    /// Ask the backend to retry a failed or incomplete model download.
    ///
    /// Fire-and-forget; the effect is only observable through the next
    /// availability snapshot. Backends without a local model ignore it.
    fn retry_download(&self) {}
}
