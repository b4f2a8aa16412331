//! Infrastructure layer for coursechat.
//!
//! Contains implementations of the ports defined in `coursechat-core`:
//! the reqwest-based backend client, the JSON preference store, plus the
//! config loader, data directory layout and terminal theme detection.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod preferences;
pub mod theme_probe;
