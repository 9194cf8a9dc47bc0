use thiserror::Error;

/// Errors from an AI backend call (reply generation or keyword extraction).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

/// Errors from a search backend call.
///
/// The conversation core never surfaces these: a failed search degrades to
/// an empty result set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search backend error: {0}")]
    Backend(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("search timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
}

/// Errors from checking or installing the on-device model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    #[error("on-device model unsupported: {0}")]
    Unsupported(String),

    #[error("model source missing: {0}")]
    SourceMissing(String),

    #[error("model install I/O error: {0}")]
    Io(String),
}

impl InstallError {
    /// Stable numeric code published as `BackendSnapshot::last_error_code`.
    pub fn code(&self) -> i32 {
        match self {
            InstallError::Unsupported(_) => 1,
            InstallError::SourceMissing(_) => 2,
            InstallError::Io(_) => 3,
        }
    }
}

/// Outcome taxonomy of a conversation query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// Blank query; ignored without touching state.
    #[error("query is empty")]
    EmptyQuery,

    /// One of the concurrent AI calls failed. An assistant error message has
    /// already been appended when this is returned.
    #[error("generation failed: {0}")]
    Generation(#[from] AiError),

    /// The pipeline was cancelled; nothing was appended.
    #[error("query cancelled")]
    Cancelled,

    /// The orchestrator has been shut down and accepts no new queries.
    #[error("conversation is shut down")]
    ShutDown,
}
