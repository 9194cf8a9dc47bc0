//! Search backend abstractions.
//!
//! `SearchBackend` is the port the conversation layer uses for the dependent
//! lookup after keyword extraction. `BoxSearchBackend` is its object-safe wrapper.

pub mod backend;

pub use backend::{BoxSearchBackend, SearchBackend};
