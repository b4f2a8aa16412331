//! Interactive CLI chat for coursechat.
//!
//! This module implements the chat loop: welcome banner, markdown rendering
//! with collapsible sources, a thinking spinner and slash commands.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod view;
