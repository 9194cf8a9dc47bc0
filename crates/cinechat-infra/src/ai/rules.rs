//! Offline rule-based AI backend.
//!
//! Composes replies from a small set of templates and extracts keywords with
//! [`extract_keywords`]. Output is deterministic for a given query, which
//! keeps the CLI usable without any model runtime.

use std::path::PathBuf;

use cinechat_core::ai::AiBackend;
use cinechat_types::error::AiError;
use tracing::debug;

use super::keywords::extract_keywords;

pub struct RuleBasedAiBackend {
    name: String,
    max_keywords: usize,
    /// Model file that must exist before this backend will answer.
    required_model: Option<PathBuf>,
}

impl RuleBasedAiBackend {
    /// Always-available backend standing in for the cloud model.
    pub fn remote(max_keywords: usize) -> Self {
        Self {
            name: "rule-based-remote".to_string(),
            max_keywords,
            required_model: None,
        }
    }

    /// Backend that answers only once the on-device model file is installed.
    pub fn on_device(model_path: PathBuf, max_keywords: usize) -> Self {
        Self {
            name: "rule-based-on-device".to_string(),
            max_keywords,
            required_model: Some(model_path),
        }
    }

    async fn ensure_model(&self) -> Result<(), AiError> {
        let Some(path) = &self.required_model else {
            return Ok(());
        };
        match tokio::fs::try_exists(path).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AiError::ModelUnavailable(format!(
                "{} is not installed",
                path.display()
            ))),
            Err(err) => Err(AiError::ModelUnavailable(format!(
                "cannot read {}: {err}",
                path.display()
            ))),
        }
    }

    /// Reply text for `query` given its extracted keywords.
    pub fn compose_reply(query: &str, keywords: &[String]) -> String {
        match keywords {
            [] => format!(
                "I couldn't find anything to search for in \"{query}\". \
                 Try naming a genre, a mood, or a title you enjoyed."
            ),
            [only] => format!("Looking for something {only}? Here are a few picks worth a look."),
            [init @ .., last] => format!(
                "Looking for something {} and {last}? Here are a few picks worth a look.",
                init.join(", ")
            ),
        }
    }
}

impl AiBackend for RuleBasedAiBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_reply(&self, query: &str) -> Result<String, AiError> {
        self.ensure_model().await?;
        let keywords = extract_keywords(query, self.max_keywords);
        debug!(backend = %self.name, keywords = keywords.len(), "composed reply");
        Ok(Self::compose_reply(query, &keywords))
    }

    async fn extract_search_terms(&self, query: &str) -> Result<Vec<String>, AiError> {
        self.ensure_model().await?;
        Ok(extract_keywords(query, self.max_keywords))
    }
}
