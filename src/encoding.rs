//! Text encoding resolution for uploaded exports.
//!
//! Exports come out of the booking tool in whatever encoding the operator
//! picked, so the raw bytes are tried against an ordered list of candidates.

use encoding_rs::{Encoding, IBM866, UTF_8, WINDOWS_1251};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Windows-1251 leaves this byte unassigned
const CP1251_UNDEFINED: u8 = 0x98;

/// Encodings tried when decoding an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8 with an optional byte order mark stripped
    #[serde(rename = "utf-8-sig")]
    Utf8Sig,
    #[serde(rename = "cp1251")]
    Windows1251,
    #[serde(rename = "cp866")]
    Ibm866,
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD
    #[serde(rename = "utf-8-lossy")]
    Utf8Lossy,
}

impl TextEncoding {
    /// Default candidate order; the lossy variant is only used when all fail
    pub const CANDIDATES: [TextEncoding; 5] = [
        TextEncoding::Utf8Sig,
        TextEncoding::Windows1251,
        TextEncoding::Ibm866,
        TextEncoding::Latin1,
        TextEncoding::Utf8,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Windows1251 => "cp1251",
            TextEncoding::Ibm866 => "cp866",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Lossy => "utf-8-lossy",
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding
    fn decode_strict(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                strict(UTF_8, body)
            }
            TextEncoding::Windows1251 => {
                if bytes.contains(&CP1251_UNDEFINED) {
                    None
                } else {
                    strict(WINDOWS_1251, bytes)
                }
            }
            TextEncoding::Ibm866 => strict(IBM866, bytes),
            // ISO-8859-1 maps every byte to the code point of the same value
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8 => strict(UTF_8, bytes),
            TextEncoding::Utf8Lossy => {
                Some(UTF_8.decode_without_bom_handling(bytes).0.into_owned())
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Decoded export text and the encoding that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decode raw export bytes with the first candidate that accepts them.
/// Never fails: falls back to lossy UTF-8.
pub fn decode(bytes: &[u8], candidates: &[TextEncoding]) -> DecodedText {
    for &encoding in candidates {
        if let Some(text) = encoding.decode_strict(bytes) {
            debug!("Decoded {} bytes as {}", bytes.len(), encoding);
            return DecodedText { text, encoding };
        }
        debug!("Input is not valid {}", encoding);
    }

    warn!("No candidate encoding matched, decoding as lossy UTF-8");
    let encoding = TextEncoding::Utf8Lossy;
    let text = encoding.decode_strict(bytes).unwrap_or_default();
    DecodedText { text, encoding }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_default(bytes: &[u8]) -> DecodedText {
        decode(bytes, &TextEncoding::CANDIDATES)
    }

    #[test]
    fn test_utf8_with_bom_is_stripped() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice("Рейс;Дата".as_bytes());

        let decoded = decode_default(&bytes);
        assert_eq!(decoded.encoding, TextEncoding::Utf8Sig);
        assert_eq!(decoded.text, "Рейс;Дата");
    }

    #[test]
    fn test_plain_utf8_resolves_as_first_candidate() {
        let decoded = decode_default("Flight;Date\nN4-281;01.09.2025".as_bytes());
        assert_eq!(decoded.encoding, TextEncoding::Utf8Sig);
        assert!(decoded.text.starts_with("Flight;Date"));
    }

    #[test]
    fn test_cp1251_bytes_decode_as_cyrillic() {
        let (bytes, _, _) = WINDOWS_1251.encode("Рейс;Дата;Сегмент");
        let decoded = decode_default(&bytes);

        assert_eq!(decoded.encoding, TextEncoding::Windows1251);
        assert_eq!(decoded.text, "Рейс;Дата;Сегмент");
    }

    #[test]
    fn test_byte_undefined_in_cp1251_falls_through_to_cp866() {
        let decoded = decode_default(b"\x98\x8f\xa5");
        assert_eq!(decoded.encoding, TextEncoding::Ibm866);
        assert_eq!(decoded.text, "ШПе");
    }

    #[test]
    fn test_cp866_export_header() {
        let (bytes, _, had_errors) = IBM866.encode("Шифр;Рейс;Дата");
        assert!(!had_errors);
        let decoded = decode_default(&bytes);
        assert_eq!(decoded.encoding, TextEncoding::Ibm866);
        assert_eq!(decoded.text, "Шифр;Рейс;Дата");
    }

    #[test]
    fn test_latin1_reached_when_earlier_candidates_fail() {
        let candidates = [TextEncoding::Utf8, TextEncoding::Latin1];
        let decoded = decode(b"Caf\xe9;01.09.2025", &candidates);
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
        assert_eq!(decoded.text, "Café;01.09.2025");
    }

    #[test]
    fn test_plain_utf8_candidate() {
        let decoded = decode("Рейс".as_bytes(), &[TextEncoding::Utf8, TextEncoding::Latin1]);
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "Рейс");
    }

    #[test]
    fn test_lossy_fallback_when_no_candidate_matches() {
        let decoded = decode(b"N4\xFF-281", &[TextEncoding::Utf8]);
        assert_eq!(decoded.encoding, TextEncoding::Utf8Lossy);
        assert_eq!(decoded.text, "N4\u{FFFD}-281");

        let decoded = decode(b"\x98", &[TextEncoding::Windows1251]);
        assert_eq!(decoded.encoding, TextEncoding::Utf8Lossy);
    }

    #[test]
    fn test_empty_input() {
        let decoded = decode_default(b"");
        assert_eq!(decoded.encoding, TextEncoding::Utf8Sig);
        assert!(decoded.text.is_empty());
    }

    #[test]
    fn test_candidate_order() {
        let labels: Vec<&str> = TextEncoding::CANDIDATES.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["utf-8-sig", "cp1251", "cp866", "latin-1", "utf-8"]);
    }

    #[test]
    fn test_labels_match_serialized_names() {
        for encoding in TextEncoding::CANDIDATES {
            let json = serde_json::to_string(&encoding).unwrap();
            assert_eq!(json, format!("\"{}\"", encoding.label()));
        }
        let parsed: TextEncoding = serde_json::from_str("\"cp866\"").unwrap();
        assert_eq!(parsed, TextEncoding::Ibm866);
    }
}
