//! Theme state: the applied color theme and its persisted preference.
//!
//! The applied theme is published on a `watch` channel so the terminal
//! formatter can pick its skin without holding a reference to the state.
//! Persistence goes through the [`PreferenceStore`] port; implementations
//! live in coursechat-infra.

use coursechat_types::error::StoreError;
use coursechat_types::theme::Theme;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Preference key under which the theme is stored.
pub const THEME_KEY: &str = "theme";

/// String key-value preference persistence.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait PreferenceStore: Send + Sync {
    /// Read a value. Returns None if the key was never written.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Source of the operating environment's preferred theme.
pub trait SystemThemeProbe: Send + Sync {
    fn preferred_theme(&self) -> Option<Theme>;
}

impl<T> SystemThemeProbe for T
where
    T: Fn() -> Option<Theme> + Send + Sync,
{
    fn preferred_theme(&self) -> Option<Theme> {
        self()
    }
}

/// Applied theme plus the store it is persisted in.
pub struct ThemeState<S: PreferenceStore, P: SystemThemeProbe> {
    store: S,
    probe: P,
    applied: watch::Sender<Theme>,
}

impl<S: PreferenceStore, P: SystemThemeProbe> ThemeState<S, P> {
    /// Create the state with the default theme applied. Call
    /// [`initialize`](Self::initialize) to load the stored preference.
    pub fn new(store: S, probe: P) -> Self {
        let (applied, _) = watch::channel(Theme::default());
        Self {
            store,
            probe,
            applied,
        }
    }

    /// Apply the stored theme, else the system preference, else `Dark`.
    ///
    /// An unreadable or unrecognised stored value is treated as absent.
    pub async fn initialize(&self) -> Theme {
        let stored = match self.store.get(THEME_KEY).await {
            Ok(Some(value)) => match value.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(err) => {
                    warn!(value = %value, error = %err, "Ignoring stored theme");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "Failed to read theme preference");
                None
            }
        };

        let theme = stored
            .or_else(|| self.probe.preferred_theme())
            .unwrap_or_default();
        debug!(theme = %theme, from_store = stored.is_some(), "Theme initialized");
        self.applied.send_replace(theme);
        theme
    }

    /// Flip the applied theme, persist it and return it.
    ///
    /// A failed write is logged; the applied theme still changes.
    pub async fn toggle(&self) -> Theme {
        let theme = self.current().toggled();
        self.applied.send_replace(theme);

        if let Err(err) = self.store.set(THEME_KEY, &theme.to_string()).await {
            warn!(theme = %theme, error = %err, "Failed to persist theme preference");
        }
        theme
    }

    pub fn current(&self) -> Theme {
        *self.applied.borrow()
    }

    /// Watch the applied theme.
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.applied.subscribe()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl MemoryStore {
        fn with(key: &str, value: &str) -> Self {
            let store = Self::default();
            store
                .values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        fn value(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }
    }

    impl PreferenceStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.value(key))
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Parse("read-only".to_string()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn no_preference() -> Option<Theme> {
        None
    }

    #[tokio::test]
    async fn test_stored_theme_wins() {
        let state = ThemeState::new(MemoryStore::with(THEME_KEY, "light"), || Some(Theme::Dark));
        assert_eq!(state.initialize().await, Theme::Light);
        assert_eq!(state.current(), Theme::Light);
    }

    #[tokio::test]
    async fn test_system_preference_when_nothing_stored() {
        let state = ThemeState::new(MemoryStore::default(), || Some(Theme::Light));
        assert_eq!(state.initialize().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_defaults_to_dark() {
        let state = ThemeState::new(MemoryStore::default(), no_preference);
        assert_eq!(state.initialize().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_garbage_stored_value_falls_through() {
        let state = ThemeState::new(MemoryStore::with(THEME_KEY, "sepia"), || Some(Theme::Light));
        assert_eq!(state.initialize().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle_twice_round_trips_and_persists() {
        let state = ThemeState::new(MemoryStore::default(), no_preference);
        let original = state.initialize().await;

        let flipped = state.toggle().await;
        assert_ne!(flipped, original);
        assert_eq!(state.store().value(THEME_KEY), Some(flipped.to_string()));
        assert_eq!(state.current(), flipped);

        let back = state.toggle().await;
        assert_eq!(back, original);
        assert_eq!(state.store().value(THEME_KEY), Some(original.to_string()));
        assert_eq!(state.current(), original);
    }

    #[tokio::test]
    async fn test_toggle_applies_even_when_write_fails() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let state = ThemeState::new(store, no_preference);
        state.initialize().await;

        assert_eq!(state.toggle().await, Theme::Light);
        assert_eq!(state.current(), Theme::Light);
        assert_eq!(state.store().value(THEME_KEY), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_applied_theme() {
        let state = ThemeState::new(MemoryStore::default(), no_preference);
        let mut rx = state.subscribe();
        state.toggle().await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Theme::Light);
    }
}
