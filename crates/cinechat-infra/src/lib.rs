//! Infrastructure layer for cinechat.
//!
//! Contains implementations of the port traits defined in `cinechat-core`:
//! a rule-based offline AI backend, a JSON catalog search backend, and a
//! filesystem model installer. Also owns config loading and data-dir layout.

pub mod ai;
pub mod config;
pub mod filesystem;
pub mod model;
pub mod search;
