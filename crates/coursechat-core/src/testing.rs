//! In-memory `ChatBackend` used by the controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use coursechat_types::error::{RequestError, TransportError};
use coursechat_types::query::{CourseStats, QueryRequest, QueryResponse};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::backend::ChatBackend;

/// How the fake answers a given query text.
#[derive(Clone)]
pub(crate) enum Reply {
    Answer(QueryResponse),
    Fail(TransportError),
    /// Never settles unless cancelled.
    Hang,
    /// Waits for the notify, honouring cancellation meanwhile.
    Gated(Arc<Notify>, QueryResponse),
    /// Waits for the notify and then answers even if cancelled.
    GatedIgnoringCancel(Arc<Notify>, QueryResponse),
}

pub(crate) fn answer(text: &str, session_id: &str) -> QueryResponse {
    QueryResponse {
        answer: text.to_string(),
        sources: Vec::new(),
        source_links: Vec::new(),
        session_id: session_id.to_string(),
    }
}

/// Scripted backend: replies are looked up by query text.
///
/// Unscripted queries answer with an echo in session `"default"`.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: Mutex<HashMap<String, Reply>>,
    queries: Mutex<Vec<QueryRequest>>,
    clears: Mutex<Vec<String>>,
    clear_hangs: bool,
    clear_fails: bool,
    stats: Option<CourseStats>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Session clear calls never resolve.
    pub(crate) fn with_hanging_clear(mut self) -> Self {
        self.clear_hangs = true;
        self
    }

    /// Session clear calls fail with a network error.
    pub(crate) fn with_failing_clear(mut self) -> Self {
        self.clear_fails = true;
        self
    }

    pub(crate) fn with_stats(mut self, stats: CourseStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub(crate) fn script(&self, query: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .insert(query.to_string(), reply);
    }

    /// Script a reply released by the returned notify, cancellable meanwhile.
    pub(crate) fn script_gated(&self, query: &str, response: QueryResponse) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.script(query, Reply::Gated(Arc::clone(&release), response));
        release
    }

    /// Script a reply released by the returned notify that ignores cancellation.
    pub(crate) fn script_gated_ignoring_cancel(
        &self,
        query: &str,
        response: QueryResponse,
    ) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.script(query, Reply::GatedIgnoringCancel(Arc::clone(&release), response));
        release
    }

    pub(crate) fn queries(&self) -> Vec<QueryRequest> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn clears(&self) -> Vec<String> {
        self.clears.lock().unwrap().clone()
    }

    /// Yield until at least `count` queries have reached the backend.
    pub(crate) async fn wait_for_queries(&self, count: usize) {
        while self.queries.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Yield until at least `count` clear calls have reached the backend.
    pub(crate) async fn wait_for_clears(&self, count: usize) {
        while self.clears.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

impl ChatBackend for ScriptedBackend {
    async fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, RequestError> {
        self.queries.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&request.query)
            .cloned()
            .unwrap_or_else(|| Reply::Answer(answer(&format!("echo: {}", request.query), "default")));

        if let Reply::GatedIgnoringCancel(release, response) = reply {
            release.notified().await;
            return Ok(response);
        }

        let work = async move {
            match reply {
                Reply::Answer(response) => Ok(response),
                Reply::Fail(err) => Err(RequestError::Transport(err)),
                Reply::Hang => std::future::pending().await,
                Reply::Gated(release, response) => {
                    release.notified().await;
                    Ok(response)
                }
                Reply::GatedIgnoringCancel(..) => unreachable!("handled above"),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RequestError::Cancelled),
            result = work => result,
        }
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), TransportError> {
        self.clears.lock().unwrap().push(session_id.to_string());
        if self.clear_hangs {
            std::future::pending::<()>().await;
        }
        if self.clear_fails {
            return Err(TransportError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    async fn course_stats(&self) -> Result<CourseStats, TransportError> {
        self.stats.clone().ok_or(TransportError::Status {
            status: 500,
            detail: Some("Analytics error".to_string()),
        })
    }
}
