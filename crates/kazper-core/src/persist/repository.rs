//! StateRepository - 判定結果と設定の読み書き
//!
//! Wraps a [`KeyValueStore`] with the two well-known keys. Reads never fail:
//! missing, unreadable or malformed documents come back as the empty/default
//! value. Writes return the store error so the caller decides how loud to be.

use std::sync::Arc;

use super::codec::{
    deserialize_choices, deserialize_prefs, serialize_choices, serialize_prefs,
};
use crate::domain::{BucketAssignment, Preferences};
use crate::ports::{KeyValueStore, StorageError};

/// Default namespace for both keys.
pub const DEFAULT_NAMESPACE: &str = "kazper.picker.v1";

/// Storage keys under one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub choices: String,
    pub prefs: String,
}

impl StorageKeys {
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            choices: format!("{namespace}.choices"),
            prefs: format!("{namespace}.prefs"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }
}

pub struct StateRepository {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl StateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(key, %error, "failed to read stored state; using defaults");
                None
            }
        }
    }

    /// Stored bucket assignment, not yet sanitized against any catalog.
    pub fn read_choices(&self) -> BucketAssignment {
        self.read(&self.keys.choices)
            .map(|raw| deserialize_choices(&raw))
            .unwrap_or_default()
    }

    pub fn write_choices(&self, buckets: &BucketAssignment) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&serialize_choices(buckets))?;
        self.store.set(&self.keys.choices, &raw)
    }

    /// Stored preferences layered over `base`.
    pub fn read_prefs(&self, base: Preferences) -> Preferences {
        self.read(&self.keys.prefs)
            .map(|raw| deserialize_prefs(&raw, base))
            .unwrap_or(base)
    }

    pub fn write_prefs(&self, prefs: &Preferences) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&serialize_prefs(prefs))?;
        self.store.set(&self.keys.prefs, &raw)
    }

    /// Remove both documents. Both removals are attempted; the first error wins.
    pub fn clear(&self) -> Result<(), StorageError> {
        let choices = self.store.remove(&self.keys.choices);
        let prefs = self.store.remove(&self.keys.prefs);
        choices.and(prefs)
    }
}

impl std::fmt::Debug for StateRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRepository")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
