//! Domain model (entities, buckets, preferences, phases, errors).

pub mod entity;
pub mod catalog;
pub mod bucket;
pub mod prefs;
pub mod state;
pub mod errors;

pub use entity::{EntityId, Gender, Locale, NameEntity, ID_SEPARATOR};
pub use catalog::EntityCatalog;
pub use bucket::{Bucket, BucketAssignment, HistoryEntry};
pub use prefs::{GenderMode, Preferences};
pub use state::DeckPhase;
pub use errors::{EngineError, LoadError};
