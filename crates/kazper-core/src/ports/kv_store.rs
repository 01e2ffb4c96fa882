//! KeyValueStore port - 永続化ストアの抽象化
//!
//! Values are opaque strings (JSON documents). Each call is all-or-nothing:
//! a failed `set` leaves the previous value in place.

use thiserror::Error;

/// StorageError はストア操作の失敗
///
/// The session swallows these (after logging): a failed write only means the
/// next reload may miss the latest change.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),
}

/// KeyValueStore は文字列キーと文字列値のストア
///
/// # Thread Safety
/// - `&self` で操作できること（実装側で内部可変性を持つ）
/// - `Send + Sync` を要求
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
