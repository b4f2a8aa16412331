//! Request and response bodies of the course-materials backend API.
//!
//! Field names follow the backend's JSON exactly (`snake_case`).

use serde::{Deserialize, Serialize};

/// Body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// `null` on the first turn; the backend then opens a new session.
    pub session_id: Option<String>,
}

/// Body returned by `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    /// Parallel to `sources`; `None` where a source has no lesson link.
    #[serde(default)]
    pub source_links: Vec<Option<String>>,
    pub session_id: String,
}

/// Body of `POST /api/session/clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearSessionRequest {
    pub session_id: String,
}

/// Body returned by `POST /api/session/clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearSessionResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Body returned by `GET /api/courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    pub total_courses: u32,
    #[serde(default)]
    pub course_titles: Vec<String>,
}

/// Error body the backend returns with non-2xx statuses.
///
/// `detail` is a string for application errors and a list for request
/// validation errors, so it is kept as raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable detail, if the backend sent one.
    pub fn detail_text(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_serializes_null_session() {
        let request = QueryRequest {
            query: "What is lesson 2 about?".to_string(),
            session_id: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"query":"What is lesson 2 about?","session_id":null}"#);
    }

    #[test]
    fn test_query_response_with_null_links() {
        let json = r#"{
            "answer": "It covers X.",
            "sources": ["Lesson 2", "Lesson 3"],
            "source_links": ["http://a", null],
            "session_id": "s1"
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.source_links, vec![Some("http://a".to_string()), None]);
        assert_eq!(response.session_id, "s1");
    }

    #[test]
    fn test_query_response_missing_sources_default_empty() {
        let json = r#"{"answer": "ok", "session_id": "s9"}"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert!(response.sources.is_empty());
        assert!(response.source_links.is_empty());
    }

    #[test]
    fn test_error_body_detail_variants() {
        let text: ErrorBody = serde_json::from_str(r#"{"detail": "RAG system error"}"#).unwrap();
        assert_eq!(text.detail_text(), "RAG system error");

        let list: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body", "query"]}]}"#).unwrap();
        assert!(list.detail_text().contains("query"));
    }

    #[test]
    fn test_course_stats_deserialize() {
        let stats: CourseStats =
            serde_json::from_str(r#"{"total_courses": 2, "course_titles": ["A", "B"]}"#).unwrap();
        assert_eq!(stats.total_courses, 2);
        assert_eq!(stats.course_titles, vec!["A", "B"]);
    }
}
