//! Conversation orchestration and backend port definitions for cinechat.
//!
//! This crate defines the "ports" (backend traits) that the infrastructure
//! layer implements, plus the logic that drives them. It depends only on
//! `cinechat-types` -- never on `cinechat-infra` or any filesystem/network crate.

pub mod ai;
pub mod availability;
pub mod conversation;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;
