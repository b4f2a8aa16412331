use thiserror::Error;

/// Failures talking to the backend, surfaced to the user as `Error: <reason>`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    ///
    /// The display text is fixed; `detail` is kept for logs only.
    #[error("Query failed")]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("failed to parse response: {0}")]
    Decode(String),
}

/// Outcome of a query that did not produce a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The request was superseded or the session was reset.
    #[error("request superseded")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors from the preference store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store is corrupt: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_is_fixed() {
        let err = TransportError::Status {
            status: 500,
            detail: Some("RAG system error".to_string()),
        };
        assert_eq!(err.to_string(), "Query failed");
    }

    #[test]
    fn test_network_error_display_is_reason() {
        let err = TransportError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_request_error_wraps_transport() {
        let err: RequestError = TransportError::Decode("missing field `answer`".to_string()).into();
        assert_eq!(err.to_string(), "failed to parse response: missing field `answer`");
        assert_ne!(err, RequestError::Cancelled);
    }
}
