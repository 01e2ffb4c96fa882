//! Errors - 読み込みと判定のエラー
//!
//! Storage failures live next to the store port
//! ([`crate::ports::StorageError`]); they never surface to the user.

use thiserror::Error;

/// LoadError は CSV 読み込みの失敗
///
/// All variants are recoverable: the caller shows the message in a banner and
/// may call load again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The source answered with a non-success status.
    #[error("Failed to fetch {location} ({status}).")]
    Fetch { location: String, status: u16 },

    /// The source could not be reached or read at all.
    #[error("Failed to read {location}: {reason}")]
    Transport { location: String, reason: String },

    #[error("CSV file is empty.")]
    EmptySource,

    #[error("CSV header must include kk, ru, en, and gender.")]
    MissingColumns,

    #[error("CSV file has no valid rows.")]
    NoValidRows,
}

/// EngineError はデッキ操作の拒否
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No current card, a transition is still pending, or the session is
    /// loading / failed.
    #[error("no swipeable card")]
    NotSwipeable,
}
