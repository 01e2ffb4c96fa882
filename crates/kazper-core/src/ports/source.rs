//! CsvSource port - name_list.csv の取得
//!
//! Fetching is the only asynchronous step; everything after the bytes arrive
//! is a synchronous transform.

use async_trait::async_trait;

use crate::domain::LoadError;

#[async_trait]
pub trait CsvSource: Send + Sync {
    /// Human-readable location used in error messages.
    fn location(&self) -> &str;

    /// Fetch the raw bytes.
    ///
    /// # Errors
    /// - `LoadError::Fetch`: the source answered with a non-success status
    /// - `LoadError::Transport`: the source could not be read
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;
}
