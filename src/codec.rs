//! ISO-8859-1 (Latin-1) text mapping.
//!
//! Every byte maps to the code point with the same value, so decoding never
//! fails and encoding is its exact inverse for `U+0000..=U+00FF`. The
//! `latin1` encoding label resolves to windows-1252, which remaps
//! `0x80..=0x9F`, so this goes through `encoding_rs::mem` instead.

use encoding_rs::{mem, UTF_8};

/// Decode Latin-1 bytes into a `String`. Never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    mem::decode_latin1(bytes).into_owned()
}

/// Encode text as Latin-1, or `None` if any character is above `U+00FF`.
pub fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    if !mem::is_str_latin1(text) {
        return None;
    }
    Some(mem::encode_latin1_lossy(text).into_owned())
}

/// UTF-8 when the bytes are valid UTF-8, Latin-1 otherwise.
pub fn decode_text(bytes: &[u8]) -> String {
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => decode_latin1(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_byte_survives_decode_and_encode() {
        let all: Vec<u8> = (0..=255).collect();
        let text = decode_latin1(&all);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode_latin1(&text).unwrap(), all);
    }

    #[test]
    fn test_c1_range_is_not_remapped() {
        // 0x80 is U+0080 in Latin-1, not the euro sign.
        assert_eq!(decode_latin1(&[0x80]), "\u{80}");
        assert_eq!(encode_latin1("\u{80}"), Some(vec![0x80]));
    }

    #[test]
    fn test_encode_rejects_wide_characters() {
        assert_eq!(encode_latin1("café"), Some(vec![b'c', b'a', b'f', 0xE9]));
        assert_eq!(encode_latin1("€"), None);
        assert_eq!(encode_latin1("A€B"), None);
    }

    #[test]
    fn test_decode_text_prefers_utf8() {
        assert_eq!(decode_text("año".as_bytes()), "año");
        assert_eq!(decode_text(&[b'a', 0xF1, b'o']), "año");
    }

    #[test]
    fn test_decode_text_keeps_bom() {
        // BOM stripping is the caller's job; the header lookup trims it.
        assert_eq!(decode_text("\u{feff}X".as_bytes()), "\u{feff}X");
    }
}
