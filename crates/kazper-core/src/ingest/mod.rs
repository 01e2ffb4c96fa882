//! Ingestion pipeline: bytes -> text -> rows -> names.

mod encoding;
mod loader;
mod tokenizer;

pub use encoding::{EncodingResolver, REQUIRED_HEADER};
pub use loader::{load, LoadOutcome};
pub use tokenizer::{is_blank_row, tokenize};

use crate::domain::LoadError;

/// Run the whole pipeline on raw bytes with the default encodings.
pub fn parse_names(bytes: &[u8]) -> Result<LoadOutcome, LoadError> {
    let text = EncodingResolver::default().resolve(bytes);
    load(&tokenize(&text))
}
