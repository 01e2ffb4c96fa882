//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryStore**: テスト・一時セッション用の KeyValueStore
//! - **JsonFileStore**: JSON ファイルに原子的に書き込む KeyValueStore
//! - **CyrillicCollator**: ru/kk 向けの Collator
//! - **FileSource / HttpSource**: CsvSource

pub mod memory_store;
pub mod file_store;
pub mod cyrillic_collator;
pub mod file_source;
pub mod http_source;

pub use self::memory_store::InMemoryStore;
pub use self::file_store::JsonFileStore;
pub use self::cyrillic_collator::CyrillicCollator;
pub use self::file_source::FileSource;
pub use self::http_source::HttpSource;

use crate::domain::LoadError;
use crate::ports::CsvSource;

/// Pick a source for a configured location: http(s) URLs go over the network,
/// anything else is a file path.
pub fn source_for(location: &str) -> Result<Box<dyn CsvSource>, LoadError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
