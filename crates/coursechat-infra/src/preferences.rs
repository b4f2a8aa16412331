//! File-backed implementation of the `PreferenceStore` port.
//!
//! Preferences live in `{data_dir}/preferences.json` as a flat JSON object of
//! string keys and values. All I/O goes through `tokio::fs`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use coursechat_core::theme::PreferenceStore;
use coursechat_types::error::StoreError;
use tokio::sync::Mutex;

/// File name of the preference store inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// JSON preference file with serialized read-modify-write updates.
pub struct FilePreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `{data_dir}/preferences.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut values = match self.read_all().await {
            Ok(values) => values,
            Err(StoreError::Parse(reason)) => {
                tracing::warn!("Overwriting corrupt {}: {reason}", self.path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        values.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!(key, "Preference saved");
        Ok(())
    }
}
