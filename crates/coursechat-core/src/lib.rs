//! Conversation logic and port traits for coursechat.
//!
//! This crate defines the ports (`ChatBackend`, `PreferenceStore`) that the
//! infrastructure layer implements. It depends only on `coursechat-types`,
//! never on `coursechat-infra` or any network or filesystem crate.

pub mod backend;
pub mod catalog;
pub mod chat;
pub mod event;
pub mod render;
pub mod theme;

#[cfg(test)]
mod testing;
