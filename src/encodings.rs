//! PDFDocEncoding: a fixed 8-bit character set with gaps that must not
//! round-trip. The forward table is a process-wide constant; the reverse
//! map is built from it once.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Maps a PDFDocEncoding byte to its Unicode scalar value, or `None` for an
/// undefined slot.
pub fn decode_char(byte: u8) -> Option<char> {
    let code = match byte {
        0x00..=0x17 => byte as u32,
        0x18 => 0x02D8,
        0x19 => 0x02C7,
        0x1A => 0x02C6,
        0x1B => 0x02D9,
        0x1C => 0x02DD,
        0x1D => 0x02DB,
        0x1E => 0x02DA,
        0x1F => 0x02DC,
        0x20..=0x7E => byte as u32,
        0x7F => return None,
        0x80 => 0x2022,
        0x81 => 0x2020,
        0x82 => 0x2021,
        0x83 => 0x2026,
        0x84 => 0x2014,
        0x85 => 0x2013,
        0x86 => 0x0192,
        0x87 => 0x2044,
        0x88 => 0x2039,
        0x89 => 0x203A,
        0x8A => 0x2212,
        0x8B => 0x2030,
        0x8C => 0x201E,
        0x8D => 0x201C,
        0x8E => 0x201D,
        0x8F => 0x2018,
        0x90 => 0x2019,
        0x91 => 0x201A,
        0x92 => 0x2122,
        0x93 => 0xFB01,
        0x94 => 0xFB02,
        0x95 => 0x0141,
        0x96 => 0x0152,
        0x97 => 0x0160,
        0x98 => 0x0178,
        0x99 => 0x017D,
        0x9A => 0x0131,
        0x9B => 0x0142,
        0x9C => 0x0153,
        0x9D => 0x0161,
        0x9E => 0x017E,
        0x9F => return None,
        0xA0 => 0x20AC,
        0xA1..=0xFF => byte as u32,
    };
    char::from_u32(code)
}

static REVERSE: LazyLock<HashMap<char, u8>> =
    LazyLock::new(|| (0u8..=0xFF).filter_map(|byte| decode_char(byte).map(|c| (c, byte))).collect());

pub fn encode_char(c: char) -> Option<u8> {
    REVERSE.get(&c).copied()
}

/// Decode `bytes` as PDFDocEncoding, failing on the first undefined slot so
/// that callers can fall back to a `ByteString`.
pub fn decode(bytes: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        out.push(decode_char(byte)?);
    }
    Some(out)
}

/// Encode `text` as PDFDocEncoding, failing if any character has no
/// representation.
pub fn encode(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        out.push(encode_char(c)?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let text = "Hello, World!";
        let encoded = encode(text).unwrap();
        assert_eq!(decode(&encoded).unwrap(), text);
    }

    #[test]
    fn undefined_slot_rejects() {
        assert!(decode_char(0x7F).is_none());
        assert!(decode_char(0x9F).is_none());
    }

    #[test]
    fn bullet_round_trips() {
        assert_eq!(decode_char(0x80), Some('\u{2022}'));
        assert_eq!(encode_char('\u{2022}'), Some(0x80));
    }
}
