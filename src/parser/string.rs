use crate::encodings;
use crate::object::StringProvenance;
use crate::parser::lexer::Cursor;
use crate::reader::MAX_BRACKET;
use crate::{Error, Object, Result};

/// Reads a literal string `( ... )`, handling balanced parens and the
/// standard backslash escape set.
pub(crate) fn read_literal_string(cursor: &mut Cursor) -> Result<Object> {
    if cursor.advance() != Some(b'(') {
        return Err(Error::Parse(crate::error::ParseError::InvalidObject));
    }

    let mut out = Vec::new();
    let mut depth: usize = 1;

    loop {
        if depth > MAX_BRACKET {
            return Err(Error::Parse(crate::error::ParseError::InvalidObject));
        }
        let Some(byte) = cursor.advance() else {
            return Err(Error::Parse(crate::error::ParseError::InvalidObject));
        };
        match byte {
            b'(' => {
                depth += 1;
                out.push(byte);
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                out.push(byte);
            }
            b'\\' => {
                let Some(escaped) = cursor.advance() else {
                    return Err(Error::Parse(crate::error::ParseError::InvalidObject));
                };
                match escaped {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0C),
                    b'(' => out.push(b'('),
                    b')' => out.push(b')'),
                    b'\\' => out.push(b'\\'),
                    b'\r' => {
                        // `\` followed by CRLF or CR elides the newline.
                        if cursor.peek() == Some(b'\n') {
                            cursor.advance();
                        }
                    }
                    b'\n' => {}
                    d @ b'0'..=b'7' => {
                        let mut value = (d - b'0') as u32;
                        for _ in 0..2 {
                            match cursor.peek() {
                                Some(o @ b'0'..=b'7') => {
                                    value = value * 8 + (o - b'0') as u32;
                                    cursor.advance();
                                }
                                _ => break,
                            }
                        }
                        out.push((value & 0xFF) as u8);
                    }
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }

    Ok(classify_string(out))
}

/// Reads a hex string `< ... >`; whitespace between digit pairs is allowed
/// and a trailing odd digit is padded with `0`.
pub(crate) fn read_hex_string(cursor: &mut Cursor) -> Result<Object> {
    if cursor.advance() != Some(b'<') {
        return Err(Error::Parse(crate::error::ParseError::InvalidObject));
    }

    let mut digits = Vec::new();
    loop {
        match cursor.advance() {
            Some(b'>') => break,
            Some(b) if b.is_ascii_whitespace() => {}
            Some(b) => digits.push(b),
            None => return Err(Error::Parse(crate::error::ParseError::InvalidObject)),
        }
    }
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let hi = hex_value(pair[0])?;
        let lo = hex_value(pair[1])?;
        bytes.push(hi << 4 | lo);
    }

    Ok(classify_string(bytes))
}

fn hex_value(byte: u8) -> Result<u8> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(Error::Parse(crate::error::ParseError::InvalidObject)),
    }
}

/// Classify a freshly parsed string: a UTF-16 BE BOM yields a `TextString`
/// tagged `utf16be`; otherwise a
/// successful PDFDocEncoding round-trip yields one tagged `pdfdocencoding`;
/// failure yields a `ByteString`.
pub(crate) fn classify_string(bytes: Vec<u8>) -> Object {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..].chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
        let text = String::from_utf16_lossy(&units);
        return Object::TextString(text, StringProvenance::Utf16Be);
    }

    match encodings::decode(&bytes) {
        Some(text) => Object::TextString(text, StringProvenance::PdfDocEncoding),
        None => Object::ByteString(bytes),
    }
}

/// Reproduce a `TextString`'s original bytes from its provenance tag.
pub fn original_bytes(text: &str, provenance: StringProvenance) -> Result<Vec<u8>> {
    match provenance {
        StringProvenance::Utf16Be => {
            let mut bytes = vec![0xFE, 0xFF];
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
            Ok(bytes)
        }
        StringProvenance::PdfDocEncoding => {
            encodings::encode(text).ok_or(Error::EncodingError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_string_escapes() {
        let mut cursor = Cursor::new(b"(Hello\\nWorld)");
        let obj = read_literal_string(&mut cursor).unwrap();
        assert_eq!(obj, Object::TextString("Hello\nWorld".to_string(), StringProvenance::PdfDocEncoding));
    }

    #[test]
    fn backspace_escape_maps_to_0x08() {
        let mut cursor = Cursor::new(b"(\\b)");
        let obj = read_literal_string(&mut cursor).unwrap();
        match obj {
            Object::TextString(text, _) => assert_eq!(text.as_bytes(), &[0x08]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hex_string_odd_digit_padded() {
        let mut cursor = Cursor::new(b"<6>");
        let obj = read_hex_string(&mut cursor).unwrap();
        match obj {
            Object::TextString(text, _) => assert_eq!(text.as_bytes(), &[0x60]),
            Object::ByteString(bytes) => assert_eq!(bytes, vec![0x60]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn utf16be_bom_is_detected() {
        let mut cursor = Cursor::new(b"<FEFF0041>");
        let obj = read_hex_string(&mut cursor).unwrap();
        assert_eq!(obj, Object::TextString("A".to_string(), StringProvenance::Utf16Be));
        if let Object::TextString(text, provenance) = obj {
            assert_eq!(original_bytes(&text, provenance).unwrap(), vec![0xFE, 0xFF, 0x00, 0x41]);
        }
    }
}
