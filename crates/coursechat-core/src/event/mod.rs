//! Conversation events for rendering surfaces.
//!
//! The session controller owns the message list; surfaces subscribe to an
//! `EventBus` and replay these events to stay in sync with it.

pub mod bus;

pub use bus::EventBus;

use uuid::Uuid;

use crate::render::RenderedMessage;

/// A change to the conversation, in the order it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A message was appended to the end of the list.
    MessageAppended(RenderedMessage),
    /// A message (the loading placeholder) was removed.
    MessageRemoved(Uuid),
    /// The whole list was dropped for a new session.
    Cleared,
    /// The backend issued a session id and the controller adopted it.
    SessionAdopted(String),
    /// The surface should move focus back to the input.
    FocusRequested,
}
