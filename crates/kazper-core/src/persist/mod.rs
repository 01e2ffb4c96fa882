//! Persist: stored form of bucket assignment and preferences.

mod codec;
mod repository;

pub use codec::{
    StoredChoices, StoredPrefs, deserialize_choices, deserialize_prefs, sanitize,
    serialize_choices, serialize_prefs,
};
pub use repository::{DEFAULT_NAMESPACE, StateRepository, StorageKeys};
