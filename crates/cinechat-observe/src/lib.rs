//! Observability setup for cinechat.

pub mod tracing_setup;
