//! Shared domain types for cinechat.
//!
//! This crate contains the core domain types used across the workspace:
//! conversation messages, the published conversation state, the AI backend
//! availability state machine, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod item;
pub mod state;
