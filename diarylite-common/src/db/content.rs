//! Item content encoding
//!
//! Item text is stored base64 encoded (standard alphabet, padded).

use base64::{engine::general_purpose, Engine as _};
use tracing::warn;

pub fn encode_content(content: &str) -> String {
    general_purpose::STANDARD.encode(content.as_bytes())
}

/// Decode stored content
///
/// Rows that are not valid base64 UTF-8 are returned unchanged.
pub fn decode_content(stored: &str) -> String {
    match general_purpose::STANDARD.decode(stored) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                warn!("Stored item content is not UTF-8, returning raw value");
                stored.to_string()
            }
        },
        Err(e) => {
            warn!("Stored item content is not base64 ({}), returning raw value", e);
            stored.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_standard_base64() {
        assert_eq!(encode_content("Paris, France"), "UGFyaXMsIEZyYW5jZQ==");
        assert_eq!(encode_content(""), "");
    }

    #[test]
    fn test_decode_unicode() {
        let stored = encode_content("Café ☕");
        assert_eq!(decode_content(&stored), "Café ☕");
    }

    #[test]
    fn test_decode_falls_back_to_raw() {
        assert_eq!(decode_content("not base64!"), "not base64!");
    }
}
