//! AI backend abstractions.
//!
//! - `AiBackend`: RPITIT trait for concrete reply/keyword backends
//! - `BoxAiBackend`: object-safe wrapper for dynamic dispatch
//! - `HybridAiBackend`: routes between on-device and remote backends

pub mod backend;
pub mod box_backend;
pub mod hybrid;

pub use backend::AiBackend;
pub use box_backend::BoxAiBackend;
pub use hybrid::HybridAiBackend;
