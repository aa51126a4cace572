//! Target encoding check for the core PDF fonts.
//!
//! Standard Type1 fonts are declared with `WinAnsiEncoding`, so every string
//! drawn on a page must be representable in Windows-1252. Anything else is an
//! `EncodingError`; characters are never dropped or substituted.

use encoding_rs::{EncoderResult, WINDOWS_1252};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("character {character:?} (U+{:04X}) at byte {offset} cannot be encoded in WinAnsiEncoding", *character as u32)]
pub struct EncodingError {
    pub character: char,
    /// Byte offset of `character` in the sanitized input.
    pub offset: usize,
}

/// Encodes `text` as Windows-1252 bytes, failing on the first unmappable character.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, EncodingError> {
    let mut encoder = WINDOWS_1252.new_encoder();
    // Single-byte target: one output byte per input char, never more than the UTF-8 length.
    let mut out = vec![0u8; text.len()];
    let (result, read, written) =
        encoder.encode_from_utf8_without_replacement(text, &mut out, true);

    match result {
        EncoderResult::InputEmpty => {
            out.truncate(written);
            Ok(out)
        }
        EncoderResult::Unmappable(character) => Err(EncodingError {
            character,
            offset: read - character.len_utf8(),
        }),
        EncoderResult::OutputFull => unreachable!("single-byte encoding cannot overflow"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_round_trips() {
        assert_eq!(encode_win_ansi("Page 1").unwrap(), b"Page 1".to_vec());
    }

    #[test]
    fn test_latin1_accents_encode() {
        assert_eq!(encode_win_ansi("caf\u{e9}").unwrap(), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_euro_sign_maps_to_0x80() {
        assert_eq!(encode_win_ansi("\u{20AC}").unwrap(), vec![0x80]);
    }

    #[test]
    fn test_emoji_is_rejected_with_offset() {
        let err = encode_win_ansi("ok \u{1F393}").unwrap_err();
        assert_eq!(err.character, '\u{1F393}');
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_cjk_is_rejected() {
        let err = encode_win_ansi("\u{5B66}").unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.to_string().contains("U+5B66"));
    }

    #[test]
    fn test_empty_string() {
        assert!(encode_win_ansi("").unwrap().is_empty());
    }
}
