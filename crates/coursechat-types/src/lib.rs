//! Shared domain and wire types for coursechat.
//!
//! This crate contains the types used across the coursechat client: the
//! backend's request/response bodies, conversation messages, the theme
//! preference, client configuration and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod query;
pub mod theme;
