//! Application state wiring the infra implementations together.
//!
//! The core controllers are generic over their ports; AppState pins them to
//! the concrete infra implementations used by every command.

use std::path::PathBuf;
use std::sync::Arc;

use coursechat_core::theme::ThemeState;
use coursechat_infra::config::load_client_config;
use coursechat_infra::filesystem::ensure_data_dir;
use coursechat_infra::http::HttpChatBackend;
use coursechat_infra::preferences::FilePreferenceStore;
use coursechat_infra::theme_probe::probe_terminal_theme;
use coursechat_types::config::ClientConfig;
use coursechat_types::theme::Theme;

/// Theme state pinned to the JSON preference file and the COLORFGBG probe.
pub type ConcreteThemeState = ThemeState<FilePreferenceStore, fn() -> Option<Theme>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<HttpChatBackend>,
    pub theme: Arc<ConcreteThemeState>,
    pub config: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, wire the backend client and apply the stored theme.
    ///
    /// `base_url` (from `--base-url`) wins over the config file and the
    /// environment.
    pub async fn init(data_dir: PathBuf, base_url: Option<String>) -> anyhow::Result<Self> {
        ensure_data_dir(&data_dir).await?;

        let mut config = load_client_config(&data_dir).await;
        if let Some(base_url) = base_url {
            config.base_url = base_url;
        }

        let backend = HttpChatBackend::new(config.clone());

        let probe: fn() -> Option<Theme> = probe_terminal_theme;
        let theme = ThemeState::new(FilePreferenceStore::in_data_dir(&data_dir), probe);
        theme.initialize().await;

        Ok(Self {
            backend: Arc::new(backend),
            theme: Arc::new(theme),
            config,
            data_dir,
        })
    }
}
