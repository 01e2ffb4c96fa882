//! Encoding resolver: UTF-8 first, a single-byte Cyrillic code page second.
//!
//! The expected header is plain ASCII, so a header probe cannot tell UTF-8 from
//! windows-1251 on its own. The primary decode is therefore strict: malformed
//! UTF-8 counts as a failed attempt (empty text), which lets the fallback win
//! for legacy exports.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};

/// Header substring every valid name list contains (compared case-insensitively).
pub const REQUIRED_HEADER: &str = "kk,ru,en,gender";

#[derive(Debug, Clone, Copy)]
pub struct EncodingResolver {
    primary: &'static Encoding,
    fallback: &'static Encoding,
    required_header: &'static str,
}

impl Default for EncodingResolver {
    fn default() -> Self {
        Self::new(UTF_8, WINDOWS_1251, REQUIRED_HEADER)
    }
}

impl EncodingResolver {
    pub fn new(
        primary: &'static Encoding,
        fallback: &'static Encoding,
        required_header: &'static str,
    ) -> Self {
        Self {
            primary,
            fallback,
            required_header,
        }
    }

    /// Decode `bytes`, preferring whichever encoding exposes the header.
    ///
    /// Never fails. When neither attempt shows the header, the primary decoding
    /// is returned (lossily, if it was malformed) for the loader to reject.
    pub fn resolve(&self, bytes: &[u8]) -> String {
        let primary = decode_strict(self.primary, bytes);
        if self.has_header(&primary) {
            return primary;
        }

        let fallback = decode_strict(self.fallback, bytes);
        if self.has_header(&fallback) {
            tracing::debug!(encoding = self.fallback.name(), "using fallback encoding");
            return fallback;
        }

        if primary.is_empty() && !bytes.is_empty() {
            let (lossy, _) = self.primary.decode_with_bom_removal(bytes);
            return lossy.into_owned();
        }
        primary
    }

    fn has_header(&self, text: &str) -> bool {
        text.to_lowercase()
            .contains(&self.required_header.to_lowercase())
    }
}

/// Decode with BOM removal; malformed input yields an empty string.
fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        String::new()
    } else {
        text.into_owned()
    }
}
