//! Interactive chat for cinechat.
//!
//! The input loop submits queries and handles slash commands; a renderer task
//! follows the published conversation state and prints replies and backend
//! status changes as they land. Entry point: `loop_runner::run_chat_loop`.

pub mod commands;
pub mod loop_runner;
pub mod renderer;
