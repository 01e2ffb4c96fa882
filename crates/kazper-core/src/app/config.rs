//! PickerConfig - 設定ファイル
//!
//! JSON file under the platform config directory. Every field has a default,
//! so a partial (or missing) file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{DEFAULT_NAMESPACE, StorageKeys};

/// ConfigError は設定ファイルの読み込み失敗
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Path or http(s) URL of the names CSV.
    pub source: String,

    /// JSON key-value file holding choices and preferences.
    pub storage_path: PathBuf,

    pub storage_namespace: String,

    pub export_dir: PathBuf,

    /// How long a judged card stays locked while its transition plays.
    pub transition_ms: u64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            source: "name_list.csv".to_string(),
            storage_path: default_storage_path(),
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            export_dir: PathBuf::from("."),
            transition_ms: 145,
        }
    }
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("kazper").join("state.json"))
        .unwrap_or_else(|| PathBuf::from("kazper-state.json"))
}

impl PickerConfig {
    /// `<config dir>/kazper/picker.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kazper").join("picker.json"))
    }

    /// Load from the default location; defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_namespace(&self.storage_namespace)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
