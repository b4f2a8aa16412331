//! Client configuration loader for coursechat.
//!
//! Reads `config.toml` from the data directory (`~/.coursechat/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::Path;

use coursechat_types::config::ClientConfig;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "COURSECHAT_BASE_URL";

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - `COURSECHAT_BASE_URL`, when set and non-empty, replaces `base_url`.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config = read_config_file(data_dir).await;
    apply_env_overrides(config, std::env::var(BASE_URL_ENV).ok())
}

async fn read_config_file(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply a base-URL override from the environment.
pub fn apply_env_overrides(mut config: ClientConfig, base_url: Option<String>) -> ClientConfig {
    if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
        tracing::debug!(base_url = %base_url, "Base URL overridden from environment");
        config.base_url = base_url;
    }
    config
}
