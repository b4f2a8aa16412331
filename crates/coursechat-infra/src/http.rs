//! HttpChatBackend -- concrete [`ChatBackend`] over the backend's JSON API.
//!
//! Every endpoint is built from [`ClientConfig::endpoint`]. Non-2xx responses
//! map to [`TransportError::Status`] carrying the `detail` field of the error
//! body when the backend sent one. No timeout is configured: a query runs
//! until it settles or its cancellation token fires.

use coursechat_core::backend::ChatBackend;
use coursechat_types::config::ClientConfig;
use coursechat_types::error::{RequestError, TransportError};
use coursechat_types::query::{
    ClearSessionRequest, ClearSessionResponse, CourseStats, ErrorBody, QueryRequest, QueryResponse,
};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Backend client speaking HTTP to the course-materials API.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpChatBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured client (proxies, custom TLS).
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_query(&self, request: &QueryRequest) -> Result<QueryResponse, TransportError> {
        let url = self.config.endpoint("query");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }
}

impl ChatBackend for HttpChatBackend {
    async fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, RequestError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Query cancelled in flight");
                Err(RequestError::Cancelled)
            }
            result = self.post_query(request) => result.map_err(RequestError::from),
        }
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), TransportError> {
        let url = self.config.endpoint("session/clear");
        let response = self
            .client
            .post(&url)
            .json(&ClearSessionRequest {
                session_id: session_id.to_string(),
            })
            .send()
            .await
            .map_err(network_error)?;

        let body: ClearSessionResponse = decode(response).await?;
        debug!(session_id, status = %body.status, message = %body.message, "Session clear acknowledged");
        Ok(())
    }

    async fn course_stats(&self) -> Result<CourseStats, TransportError> {
        let url = self.config.endpoint("courses");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(network_error)?;
        decode(response).await
    }
}

fn network_error(err: reqwest::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

/// Check the status and parse a JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|e| e.detail_text());
        debug!(status = status.as_u16(), detail = ?detail, "Backend returned error status");
        return Err(TransportError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}
