//! Collator port - ロケールを考慮した文字列処理
//!
//! Display-dedupe keys and export ordering both go through this seam, so an
//! ICU-backed implementation can replace the built-in table without touching
//! the engine.

use std::cmp::Ordering;

pub trait Collator: Send + Sync {
    /// Locale-aware lower-casing used for dedupe keys.
    fn fold_case(&self, text: &str) -> String;

    /// Locale-aware ordering used for export.
    fn compare(&self, a: &str, b: &str) -> Ordering;
}
