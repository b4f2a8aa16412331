//! Client configuration for coursechat.
//!
//! `ClientConfig` represents `config.toml` in the data directory. Every field
//! has a default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Greeting shown at the top of every new conversation.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to the Course Materials Assistant! \
I can help you with questions about courses, lessons and specific content. \
What would you like to know?";

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend (no trailing path).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix under which the backend mounts its API.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// List every citation under an answer instead of only the summary line.
    #[serde(default)]
    pub show_sources_expanded: bool,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            welcome_message: default_welcome_message(),
            show_sources_expanded: false,
        }
    }
}

impl ClientConfig {
    /// Join the base URL, API prefix and an endpoint path.
    ///
    /// Tolerates a trailing slash on `base_url` and a missing leading slash on
    /// `api_prefix` or `path`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let path = path.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{prefix}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.api_prefix, "/api");
        assert!(!config.show_sources_expanded);
        assert!(config.welcome_message.starts_with("Welcome"));
    }

    #[test]
    fn test_client_config_empty_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
base_url = "https://courses.example.com"
show_sources_expanded = true
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://courses.example.com");
        assert_eq!(config.api_prefix, "/api");
        assert!(config.show_sources_expanded);
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let mut config = ClientConfig::default();
        assert_eq!(config.endpoint("/query"), "http://localhost:8000/api/query");

        config.base_url = "http://host:9000/".to_string();
        config.api_prefix = "v2/".to_string();
        assert_eq!(config.endpoint("session/clear"), "http://host:9000/v2/session/clear");

        config.api_prefix = String::new();
        assert_eq!(config.endpoint("/courses"), "http://host:9000/courses");
    }
}
