//! Conversation orchestration.
//!
//! `ConversationOrchestrator` turns one user query into a concurrently
//! computed reply and keyword set, performs the dependent search, and
//! publishes the result through a `StateStore` alongside the mirrored
//! backend availability.

pub mod orchestrator;
pub mod store;
pub mod terms;

pub use orchestrator::ConversationOrchestrator;
pub use store::{InFlight, StateStore};
pub use terms::combine_search_terms;
