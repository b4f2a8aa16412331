//! Request lifecycle: at most one query in flight per conversation.
//!
//! `RequestLifecycle` owns a single pending-request slot. Starting a request
//! cancels whatever occupies the slot and installs the new handle in one
//! critical section, so two issuers can never both believe they are current.
//!
//! When a request settles, its handle is compared by identity against the slot.
//! Only the current request may clear the slot, re-open the input gate and
//! apply its result; a superseded request resolves to
//! [`IssueOutcome::Cancelled`] whatever the backend returned.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use coursechat_types::error::{RequestError, TransportError};
use coursechat_types::query::{QueryRequest, QueryResponse};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::input::InputGate;
use crate::backend::ChatBackend;

/// Identity and cancellation signal of one issued request.
///
/// Equality compares the id only, never the token state.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: u64,
    token: CancellationToken,
}

impl RequestHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl PartialEq for RequestHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RequestHandle {}

/// The request currently occupying the slot.
#[derive(Debug)]
struct PendingRequest {
    handle: RequestHandle,
    query: String,
}

/// How an issued request ended from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome<T> {
    /// The request was still current; carries what the apply step returned.
    Settled(T),
    /// The request was superseded or cancelled; nothing was applied.
    Cancelled,
}

/// Single-slot request controller.
pub struct RequestLifecycle<B: ChatBackend> {
    backend: Arc<B>,
    slot: Mutex<Option<PendingRequest>>,
    next_id: AtomicU64,
    input: InputGate,
}

impl<B: ChatBackend> RequestLifecycle<B> {
    /// Create a lifecycle that drives `input` while requests are in flight.
    pub fn new(backend: Arc<B>, input: InputGate) -> Self {
        Self {
            backend,
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
            input,
        }
    }

    /// Claim the slot for a new request.
    ///
    /// Cancels the previous pending request, if any, installs the new handle
    /// and closes the input gate. Synchronous, so callers can order it against
    /// other state changes before anything is awaited.
    pub fn begin(&self, query: &str) -> RequestHandle {
        let handle = RequestHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        };

        let mut slot = self.slot.lock().expect("request slot lock poisoned");
        let previous = slot.replace(PendingRequest {
            handle: handle.clone(),
            query: query.to_string(),
        });
        if let Some(previous) = previous {
            previous.handle.token.cancel();
            debug!(
                superseded = previous.handle.id,
                request_id = handle.id,
                "Superseding pending query"
            );
        }
        self.input.disable();

        handle
    }

    /// Run the backend call for a handle returned by [`begin`](Self::begin).
    ///
    /// If the handle is still current when the call settles, the slot is
    /// cleared, the input gate re-opened and `apply` runs with the result while
    /// the slot lock is held, so no newer request can slip in between the
    /// identity check and the effects.
    pub async fn complete<T>(
        &self,
        handle: RequestHandle,
        request: QueryRequest,
        apply: impl FnOnce(Result<QueryResponse, TransportError>) -> T,
    ) -> IssueOutcome<T> {
        debug!(request_id = handle.id, has_session = request.session_id.is_some(), "Issuing query");
        let result = self.backend.query(&request, &handle.token).await;

        let mut slot = self.slot.lock().expect("request slot lock poisoned");
        let is_current = slot
            .as_ref()
            .is_some_and(|pending| pending.handle == handle);
        if !is_current {
            debug!(request_id = handle.id, "Query no longer current, dropping result");
            return IssueOutcome::Cancelled;
        }
        *slot = None;
        self.input.enable();

        match result {
            Ok(response) => IssueOutcome::Settled(apply(Ok(response))),
            Err(RequestError::Transport(err)) => IssueOutcome::Settled(apply(Err(err))),
            Err(RequestError::Cancelled) => IssueOutcome::Cancelled,
        }
    }

    /// Begin and complete a request in one call.
    pub async fn issue<T>(
        &self,
        query: &str,
        session_id: Option<String>,
        apply: impl FnOnce(Result<QueryResponse, TransportError>) -> T,
    ) -> IssueOutcome<T> {
        let handle = self.begin(query);
        let request = QueryRequest {
            query: query.to_string(),
            session_id,
        };
        self.complete(handle, request, apply).await
    }

    /// Cancel and forget the pending request, returning its query.
    ///
    /// Leaves the input gate untouched; the caller decides what the surface
    /// should look like afterwards.
    pub fn cancel_pending(&self) -> Option<String> {
        let pending = self
            .slot
            .lock()
            .expect("request slot lock poisoned")
            .take()?;
        pending.handle.token.cancel();
        debug!(request_id = pending.handle.id, "Cancelled pending query");
        Some(pending.query)
    }

    pub fn has_pending(&self) -> bool {
        self.slot
            .lock()
            .expect("request slot lock poisoned")
            .is_some()
    }

    /// Query text of the pending request, if any.
    pub fn pending_query(&self) -> Option<String> {
        self.slot
            .lock()
            .expect("request slot lock poisoned")
            .as_ref()
            .map(|pending| pending.query.clone())
    }

    pub fn input(&self) -> &InputGate {
        &self.input
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedBackend, answer};

    fn lifecycle(backend: ScriptedBackend) -> (Arc<ScriptedBackend>, RequestLifecycle<ScriptedBackend>) {
        let backend = Arc::new(backend);
        let lifecycle = RequestLifecycle::new(Arc::clone(&backend), InputGate::new());
        (backend, lifecycle)
    }

    #[tokio::test]
    async fn issue_settles_and_reopens_input() {
        let (backend, lifecycle) = lifecycle(ScriptedBackend::new());
        backend.script("hello", Reply::Answer(answer("hi there", "s1")));

        let outcome = lifecycle
            .issue("hello", None, |result| result.map(|r| r.answer))
            .await;

        assert_eq!(outcome, IssueOutcome::Settled(Ok("hi there".to_string())));
        assert!(!lifecycle.has_pending());
        assert!(lifecycle.input().is_enabled());
        assert_eq!(backend.queries()[0].session_id, None);
    }

    #[tokio::test]
    async fn issue_carries_session_id() {
        let (backend, lifecycle) = lifecycle(ScriptedBackend::new());
        lifecycle.issue("q", Some("s7".to_string()), |_| ()).await;
        assert_eq!(backend.queries()[0].session_id.as_deref(), Some("s7"));
    }

    #[tokio::test]
    async fn transport_failure_is_applied_and_reopens_input() {
        let (backend, lifecycle) = lifecycle(ScriptedBackend::new());
        backend.script(
            "boom",
            Reply::Fail(TransportError::Status { status: 500, detail: None }),
        );

        let outcome = lifecycle
            .issue("boom", None, |result| result.map_err(|e| e.to_string()))
            .await;

        assert_eq!(outcome, IssueOutcome::Settled(Err("Query failed".to_string())));
        assert!(lifecycle.input().is_enabled());
    }

    #[tokio::test]
    async fn begin_closes_input_and_occupies_slot() {
        let (_backend, lifecycle) = lifecycle(ScriptedBackend::new());
        let handle = lifecycle.begin("pending");

        assert!(!lifecycle.input().is_enabled());
        assert!(lifecycle.has_pending());
        assert_eq!(lifecycle.pending_query().as_deref(), Some("pending"));
        assert!(!handle.is_cancelled());
    }

    #[tokio::test]
    async fn begin_cancels_previous_handle() {
        let (_backend, lifecycle) = lifecycle(ScriptedBackend::new());
        let first = lifecycle.begin("A");
        let second = lifecycle.begin("B");

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_ne!(first, second);
        assert_eq!(lifecycle.pending_query().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn superseded_request_resolves_cancelled() {
        let (backend, lifecycle) = lifecycle(ScriptedBackend::new());
        backend.script("A", Reply::Hang);
        backend.script("B", Reply::Answer(answer("b", "s2")));
        let lifecycle = Arc::new(lifecycle);

        let first = {
            let lifecycle = Arc::clone(&lifecycle);
            tokio::spawn(async move { lifecycle.issue("A", None, |_| "applied A").await })
        };
        backend.wait_for_queries(1).await;

        let second = lifecycle.issue("B", None, |_| "applied B").await;
        let first = first.await.unwrap();

        assert_eq!(first, IssueOutcome::Cancelled);
        assert_eq!(second, IssueOutcome::Settled("applied B"));
        assert!(lifecycle.input().is_enabled());
    }

    #[tokio::test]
    async fn late_success_of_superseded_request_is_dropped() {
        // The backend ignores the token, so only the identity check protects B.
        let (backend, lifecycle) = lifecycle(ScriptedBackend::new());
        let release = backend.script_gated_ignoring_cancel("A", answer("stale", "sA"));
        let lifecycle = Arc::new(lifecycle);

        let first = {
            let lifecycle = Arc::clone(&lifecycle);
            tokio::spawn(async move { lifecycle.issue("A", None, |_| "applied A").await })
        };
        backend.wait_for_queries(1).await;

        let handle_b = lifecycle.begin("B");
        release.notify_one();
        assert_eq!(first.await.unwrap(), IssueOutcome::Cancelled);

        // A must not have reopened input or cleared B's slot.
        assert!(!lifecycle.input().is_enabled());
        assert_eq!(lifecycle.pending_query().as_deref(), Some("B"));
        assert!(!handle_b.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_pending_returns_query_and_cancels_token() {
        let (_backend, lifecycle) = lifecycle(ScriptedBackend::new());
        let handle = lifecycle.begin("A");

        assert_eq!(lifecycle.cancel_pending().as_deref(), Some("A"));
        assert!(handle.is_cancelled());
        assert!(!lifecycle.has_pending());
        assert_eq!(lifecycle.cancel_pending(), None);
    }

    #[tokio::test]
    async fn cancelled_request_does_not_apply() {
        let (backend, lifecycle) = lifecycle(ScriptedBackend::new());
        backend.script("A", Reply::Hang);
        let lifecycle = Arc::new(lifecycle);

        let task = {
            let lifecycle = Arc::clone(&lifecycle);
            tokio::spawn(async move { lifecycle.issue("A", None, |_| "applied").await })
        };
        backend.wait_for_queries(1).await;
        lifecycle.cancel_pending();

        assert_eq!(task.await.unwrap(), IssueOutcome::Cancelled);
    }
}
