//! AI backend implementations.
//!
//! Contains the offline [`RuleBasedAiBackend`], which implements the
//! [`AiBackend`](cinechat_core::ai::AiBackend) port without any model
//! runtime, plus a factory ([`create_backend_pair`]) that builds the
//! on-device/remote pair consumed by
//! [`HybridAiBackend`](cinechat_core::ai::HybridAiBackend).

pub mod keywords;
pub mod rules;

use std::path::Path;

use cinechat_core::ai::BoxAiBackend;
use cinechat_types::config::GlobalConfig;

pub use rules::RuleBasedAiBackend;

/// Build the `(on_device, remote)` backend pair.
///
/// The on-device half answers `ModelUnavailable` until the model file at
/// `model_path` exists; the remote half is always available.
pub fn create_backend_pair(model_path: &Path, config: &GlobalConfig) -> (BoxAiBackend, BoxAiBackend) {
    let max_keywords = config.search.max_keywords;
    let on_device = RuleBasedAiBackend::on_device(model_path.to_path_buf(), max_keywords);
    let remote = RuleBasedAiBackend::remote(max_keywords);
    (BoxAiBackend::new(on_device), BoxAiBackend::new(remote))
}
