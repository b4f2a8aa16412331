//! Conversation controllers.
//!
//! `request` owns the single pending-request slot, `session` owns the message
//! list and the backend session id, and `input` is the gate both of them drive.

pub mod input;
pub mod request;
pub mod session;

pub use input::InputGate;
pub use request::{IssueOutcome, RequestHandle, RequestLifecycle};
pub use session::{ChatController, TurnOutcome, spawn_session_clear};
