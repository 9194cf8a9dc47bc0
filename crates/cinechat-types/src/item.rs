//! Search result references.

use serde::{Deserialize, Serialize};

/// Opaque reference to a searchable media entity.
///
/// The conversation core never interprets these beyond carrying them on an
/// assistant message; rendering and resolution happen elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub title: String,
}

impl ItemRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}
