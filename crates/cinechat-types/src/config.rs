//! Global configuration types for cinechat.
//!
//! `GlobalConfig` represents the top-level `config.toml`. Every field has a
//! default so a partial (or empty) file is always valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `~/.cinechat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Tuning for the conversation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum recommended items attached to one assistant reply. Values
    /// above [`MAX_RECOMMENDATIONS`] are clamped by [`recommendation_limit`].
    ///
    /// [`recommendation_limit`]: ConversationConfig::recommendation_limit
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Text prepended to the cause in an assistant error message.
    #[serde(default = "default_error_reply_prefix")]
    pub error_reply_prefix: String,

    /// Optional per-call timeout for the two AI calls.
    #[serde(default)]
    pub generation_timeout_ms: Option<u64>,

    /// Optional timeout for the search call. Expiry counts as "no results".
    #[serde(default)]
    pub search_timeout_ms: Option<u64>,
}

/// Hard upper bound on recommended items per assistant message.
pub const MAX_RECOMMENDATIONS: usize = 10;

fn default_max_recommendations() -> usize {
    MAX_RECOMMENDATIONS
}

fn default_error_reply_prefix() -> String {
    "Sorry, I couldn't answer that".to_string()
}

impl ConversationConfig {
    /// Effective cap: `max_recommendations`, never above [`MAX_RECOMMENDATIONS`].
    pub fn recommendation_limit(&self) -> usize {
        self.max_recommendations.min(MAX_RECOMMENDATIONS)
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_recommendations: default_max_recommendations(),
            error_reply_prefix: default_error_reply_prefix(),
            generation_timeout_ms: None,
            search_timeout_ms: None,
        }
    }
}

/// On-device model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Try the on-device model before falling back to the remote one.
    #[serde(default = "default_true")]
    pub prefer_on_device: bool,

    /// Where the on-device model artifact is fetched from. `None` means the
    /// device has no on-device model available.
    #[serde(default)]
    pub model_source: Option<PathBuf>,

    /// Installed model location, relative to the data directory.
    #[serde(default = "default_model_file")]
    pub model_file: PathBuf,

    /// Copy granularity while installing; one progress report per chunk.
    #[serde(default = "default_download_chunk_bytes")]
    pub download_chunk_bytes: usize,
}

fn default_true() -> bool {
    true
}

fn default_model_file() -> PathBuf {
    PathBuf::from("models").join("cinechat-ondevice.bin")
}

fn default_download_chunk_bytes() -> usize {
    64 * 1024
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            prefer_on_device: true,
            model_source: None,
            model_file: default_model_file(),
            download_chunk_bytes: default_download_chunk_bytes(),
        }
    }
}

/// Search catalog and keyword settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Catalog file. Defaults to `{data_dir}/catalog.json` when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Upper bound on extracted keywords per query.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

fn default_max_keywords() -> usize {
    6
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            max_keywords: default_max_keywords(),
        }
    }
}
