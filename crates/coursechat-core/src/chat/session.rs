//! Session controller: one conversation, one server session id.
//!
//! `ChatController` owns the ordered message list and the opaque session id
//! issued by the backend. It composes the [`RequestLifecycle`] and the
//! [`MessageRenderer`] into the two user-facing operations: sending a turn and
//! starting a new session. Every change is published on the [`EventBus`] so
//! surfaces can project the conversation without owning it.
//!
//! Lock order is fixed: the request slot is always taken before the
//! conversation state, never the other way around.

use std::sync::{Arc, Mutex};

use coursechat_types::chat::{Message, MessageKind, MessageRole};
use coursechat_types::query::QueryRequest;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::input::InputGate;
use super::request::{IssueOutcome, RequestHandle, RequestLifecycle};
use crate::backend::ChatBackend;
use crate::event::{ConversationEvent, EventBus};
use crate::render::{ContentFormatter, MessageRenderer, RenderedMessage};

/// Capacity of the conversation event channel.
const EVENT_CAPACITY: usize = 256;

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// An assistant answer was appended.
    Answered,
    /// An error message was appended; carries the reason shown to the user.
    Failed(String),
    /// The turn was superseded or the session reset; nothing was appended.
    Cancelled,
}

/// Mutable conversation state guarded by a single lock.
#[derive(Debug, Default)]
struct Conversation {
    session_id: Option<String>,
    messages: Vec<Message>,
}

struct Inner<B: ChatBackend, F: ContentFormatter> {
    lifecycle: RequestLifecycle<B>,
    renderer: MessageRenderer<F>,
    conversation: Mutex<Conversation>,
    events: EventBus,
    welcome: String,
}

/// Controller for a single chat conversation.
///
/// Cloning is cheap and yields another handle to the same conversation.
pub struct ChatController<B: ChatBackend, F: ContentFormatter> {
    inner: Arc<Inner<B, F>>,
}

impl<B: ChatBackend, F: ContentFormatter> Clone for ChatController<B, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: ChatBackend, F: ContentFormatter + 'static> ChatController<B, F> {
    /// Construct a controller with no session id and a single welcome message.
    pub fn new(backend: Arc<B>, renderer: MessageRenderer<F>, welcome: impl Into<String>) -> Self {
        let controller = Self {
            inner: Arc::new(Inner {
                lifecycle: RequestLifecycle::new(backend, InputGate::new()),
                renderer,
                conversation: Mutex::new(Conversation::default()),
                events: EventBus::new(EVENT_CAPACITY),
                welcome: welcome.into(),
            }),
        };
        {
            let mut conversation = controller.lock_conversation();
            let welcome = Message::welcome(controller.inner.welcome.clone());
            controller.append_locked(&mut conversation, welcome);
        }
        controller
    }

    /// Submit a user turn.
    ///
    /// Returns `None` without touching anything when `query` is blank.
    /// Otherwise the user message and a loading placeholder are appended before
    /// this returns, the request claims the slot (superseding any pending one)
    /// and the network round trip is spawned. Dropping the handle is fine; the
    /// turn still completes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn send_turn(&self, query: &str) -> Option<JoinHandle<TurnOutcome>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let (loading_id, session_id) = {
            let mut conversation = self.lock_conversation();
            self.append_locked(&mut conversation, Message::user(query));
            let loading = Message::loading();
            let loading_id = loading.id;
            self.append_locked(&mut conversation, loading);
            (loading_id, conversation.session_id.clone())
        };

        let handle = self.inner.lifecycle.begin(query);
        let request = QueryRequest {
            query: query.to_string(),
            session_id,
        };

        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.run_turn(handle, request, loading_id).await
        }))
    }

    async fn run_turn(
        &self,
        handle: RequestHandle,
        request: QueryRequest,
        loading_id: Uuid,
    ) -> TurnOutcome {
        let request_id = handle.id();
        let outcome = self
            .inner
            .lifecycle
            .complete(handle, request, |result| {
                let mut conversation = self.lock_conversation();
                self.remove_locked(&mut conversation, loading_id);

                match result {
                    Ok(response) => {
                        let message = Message::assistant(
                            response.answer,
                            Some(response.sources),
                            Some(response.source_links),
                        );
                        self.append_locked(&mut conversation, message);

                        if conversation.session_id.is_none() {
                            info!(session_id = %response.session_id, "Adopted backend session");
                            conversation.session_id = Some(response.session_id.clone());
                            self.inner
                                .events
                                .publish(ConversationEvent::SessionAdopted(response.session_id));
                        }
                        TurnOutcome::Answered
                    }
                    Err(err) => {
                        warn!(request_id, error = %err, "Query failed");
                        let reason = err.to_string();
                        let message = Message::assistant(format!("Error: {reason}"), None, None);
                        self.append_locked(&mut conversation, message);
                        TurnOutcome::Failed(reason)
                    }
                }
            })
            .await;

        match outcome {
            IssueOutcome::Settled(turn) => turn,
            IssueOutcome::Cancelled => {
                debug!(request_id, "Turn cancelled");
                let mut conversation = self.lock_conversation();
                self.remove_locked(&mut conversation, loading_id);
                TurnOutcome::Cancelled
            }
        }
    }

    /// Reset to a fresh conversation.
    ///
    /// Synchronous: cancels the pending request, clears the messages, forgets
    /// the session id, re-enables and focuses input and appends the welcome
    /// message. If a session id was held, the backend is told to clear it on
    /// a detached task (see [`spawn_session_clear`]); that call is never
    /// awaited.
    pub fn start_new_session(&self) {
        if let Some(query) = self.inner.lifecycle.cancel_pending() {
            debug!(query = %query, "Dropped pending query for new session");
        }

        let previous = {
            let mut conversation = self.lock_conversation();
            conversation.messages.clear();
            self.inner.events.publish(ConversationEvent::Cleared);
            let previous = conversation.session_id.take();

            self.inner.lifecycle.input().enable();
            self.inner.events.publish(ConversationEvent::FocusRequested);

            let welcome = Message::welcome(self.inner.welcome.clone());
            self.append_locked(&mut conversation, welcome);
            previous
        };

        info!(had_session = previous.is_some(), "Started new session");
        if let Some(session_id) = previous {
            spawn_session_clear(Arc::clone(self.inner.lifecycle.backend()), session_id);
        }
    }

    /// Shut the conversation down: cancel the pending request and close input.
    pub fn dispose(&self) {
        self.inner.lifecycle.cancel_pending();
        self.inner.lifecycle.input().disable();
        debug!("Chat controller disposed");
    }

    /// The adopted backend session id, if any.
    pub fn session_id(&self) -> Option<String> {
        self.lock_conversation().session_id.clone()
    }

    /// Snapshot of the conversation.
    pub fn messages(&self) -> Vec<Message> {
        self.lock_conversation().messages.clone()
    }

    /// Snapshot of the conversation, rendered.
    pub fn rendered_messages(&self) -> Vec<RenderedMessage> {
        self.lock_conversation()
            .messages
            .iter()
            .map(|message| self.inner.renderer.render_message(message))
            .collect()
    }

    /// The most recent non-placeholder assistant message, rendered.
    pub fn last_answer(&self) -> Option<RenderedMessage> {
        self.lock_conversation()
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant && m.kind == MessageKind::Standard)
            .map(|message| self.inner.renderer.render_message(message))
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lifecycle.has_pending()
    }

    pub fn input_enabled(&self) -> bool {
        self.inner.lifecycle.input().is_enabled()
    }

    /// Watch the input gate.
    pub fn input_watch(&self) -> watch::Receiver<bool> {
        self.inner.lifecycle.input().subscribe()
    }

    /// Subscribe to conversation changes made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.inner.events.subscribe()
    }

    pub fn renderer(&self) -> &MessageRenderer<F> {
        &self.inner.renderer
    }

    fn lock_conversation(&self) -> std::sync::MutexGuard<'_, Conversation> {
        self.inner
            .conversation
            .lock()
            .expect("conversation lock poisoned")
    }

    fn append_locked(&self, conversation: &mut Conversation, message: Message) {
        let rendered = self.inner.renderer.render_message(&message);
        conversation.messages.push(message);
        self.inner
            .events
            .publish(ConversationEvent::MessageAppended(rendered));
    }

    fn remove_locked(&self, conversation: &mut Conversation, id: Uuid) {
        let before = conversation.messages.len();
        conversation.messages.retain(|m| m.id != id);
        if conversation.messages.len() != before {
            self.inner
                .events
                .publish(ConversationEvent::MessageRemoved(id));
        }
    }
}

/// Tell the backend to drop a session, without waiting for it.
///
/// Best effort: the task is detached, failures are logged at warn level and
/// never reach the conversation, and nothing is retried. Outside a Tokio
/// runtime the notification is skipped with a warning.
pub fn spawn_session_clear<B: ChatBackend>(
    backend: Arc<B>,
    session_id: String,
) -> Option<JoinHandle<()>> {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!(session_id = %session_id, "No runtime available, skipping session clear");
        return None;
    };

    Some(runtime.spawn(async move {
        match backend.clear_session(&session_id).await {
            Ok(()) => debug!(session_id = %session_id, "Backend session cleared"),
            Err(err) => warn!(session_id = %session_id, error = %err, "Failed to clear backend session"),
        }
    }))
}
