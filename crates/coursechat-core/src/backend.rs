//! ChatBackend trait definition.
//!
//! The course-materials backend is reached only through this trait. The HTTP
//! implementation lives in coursechat-infra; tests use in-memory fakes.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use coursechat_types::error::{RequestError, TransportError};
use coursechat_types::query::{CourseStats, QueryRequest, QueryResponse};
use tokio_util::sync::CancellationToken;

/// Client side of the question-answering API.
pub trait ChatBackend: Send + Sync + 'static {
    /// Ask a question within an optional session.
    ///
    /// Implementations must watch `cancel` for the whole call, including the
    /// response body decode, and return [`RequestError::Cancelled`] as soon as
    /// it fires.
    fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> impl std::future::Future<Output = Result<QueryResponse, RequestError>> + Send;

    /// Tell the backend to forget a session's conversation history.
    fn clear_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Fetch the course catalog statistics.
    fn course_stats(
        &self,
    ) -> impl std::future::Future<Output = Result<CourseStats, TransportError>> + Send;
}
