//! Tolerant UTF-8 decoding
//!
//! Decodes byte strings into codepoint sequences. Malformed sequences are
//! replaced with U+FFFD and never abort decoding; a truncated trailing
//! sequence counts as one malformed sequence.

/// Decode a UTF-8 byte string into codepoints.
///
/// Each maximal invalid sequence produces exactly one replacement
/// character, so decoding is total over arbitrary input.
pub fn decode_utf8(bytes: &[u8]) -> Vec<char> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.extend(s.chars());
                break;
            }
            Err(err) => {
                let (valid, invalid) = rest.split_at(err.valid_up_to());
                // valid_up_to() guarantees this prefix parses
                out.extend(String::from_utf8_lossy(valid).chars());
                out.push(char::REPLACEMENT_CHARACTER);
                let skip = err.error_len().unwrap_or(invalid.len());
                rest = &invalid[skip..];
            }
        }
    }
    out
}

/// Encode a codepoint slice back into a UTF-8 string.
///
/// Used at the crate's two string boundaries: clipboard text and lines
/// handed to `get_line_blocking` consumers.
pub fn encode_utf8(chars: &[char]) -> String {
    chars.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii() {
        assert_eq!(decode_utf8(b"hello"), vec!['h', 'e', 'l', 'l', 'o']);
    }

    #[test]
    fn test_decode_multibyte() {
        let hearts = "\u{2764} \u{2665}";
        assert_eq!(decode_utf8(hearts.as_bytes()), hearts.chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_utf8(b"").is_empty());
    }

    #[test]
    fn test_decode_invalid_byte_substituted() {
        // 0xFF can never start a UTF-8 sequence
        let got = decode_utf8(b"a\xFFb");
        assert_eq!(got, vec!['a', char::REPLACEMENT_CHARACTER, 'b']);
    }

    #[test]
    fn test_decode_truncated_tail() {
        // First two bytes of a three-byte sequence
        let got = decode_utf8(b"ok\xE2\x82");
        assert_eq!(got, vec!['o', 'k', char::REPLACEMENT_CHARACTER]);
    }

    #[test]
    fn test_decode_consecutive_invalid() {
        let got = decode_utf8(b"\xC0\xC0");
        assert_eq!(
            got,
            vec![char::REPLACEMENT_CHARACTER, char::REPLACEMENT_CHARACTER]
        );
    }

    #[test]
    fn test_encode_roundtrip() {
        let chars = decode_utf8("prompt> \u{263A}".as_bytes());
        assert_eq!(encode_utf8(&chars), "prompt> \u{263A}");
    }
}
