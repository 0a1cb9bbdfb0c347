use crate::object::RealNumber;
use crate::parser::lexer::Cursor;
use crate::{Error, Object, Result};

/// Reads `[-+.0-9]*`; a lexeme containing `.` is a Real (string-preserving),
/// otherwise an Integer.
pub(crate) fn read_number(cursor: &mut Cursor) -> Result<Object> {
    let mut lexeme = Vec::new();
    while let Some(b) = cursor.peek() {
        if b == b'+' || b == b'-' || b == b'.' || b.is_ascii_digit() {
            lexeme.push(b);
            cursor.advance();
        } else {
            break;
        }
    }
    if lexeme.is_empty() {
        return Err(Error::Parse(crate::error::ParseError::InvalidObject));
    }
    let text = String::from_utf8_lossy(&lexeme).to_string();
    if text.contains('.') {
        Ok(Object::Real(RealNumber::from_lexeme(text)))
    } else {
        let value = text.parse::<i64>().map_err(|_| Error::Parse(crate::error::ParseError::InvalidObject))?;
        Ok(Object::Integer(value))
    }
}

/// Looks ahead up to 20 bytes to decide whether a digit starts an indirect
/// reference `id gen R` or a plain number.
pub(crate) fn looks_like_reference(cursor: &Cursor) -> bool {
    let window_len = 20.min(cursor.remaining().len());
    let window = &cursor.remaining()[..window_len];
    matches_reference_pattern(window)
}

/// Matches `^\d+\s+\d+\s+R[^a-zA-Z]`.
fn matches_reference_pattern(window: &[u8]) -> bool {
    let mut i = 0;
    let digits1_start = i;
    while i < window.len() && window[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits1_start {
        return false;
    }
    let ws1_start = i;
    while i < window.len() && window[i].is_ascii_whitespace() {
        i += 1;
    }
    if i == ws1_start {
        return false;
    }
    let digits2_start = i;
    while i < window.len() && window[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits2_start {
        return false;
    }
    let ws2_start = i;
    while i < window.len() && window[i].is_ascii_whitespace() {
        i += 1;
    }
    if i == ws2_start {
        return false;
    }
    if window.get(i) != Some(&b'R') {
        return false;
    }
    i += 1;
    match window.get(i) {
        None => true,
        Some(b) => !b.is_ascii_alphabetic(),
    }
}

pub(crate) fn read_reference(cursor: &mut Cursor) -> Result<Object> {
    let id = read_uint(cursor)?;
    cursor.skip_non_whitespace();
    let generation = read_uint(cursor)?;
    cursor.skip_non_whitespace();
    if !cursor.consume(b"R") {
        return Err(Error::Parse(crate::error::ParseError::InvalidObject));
    }
    Ok(Object::Reference((id as u32, generation as u16)))
}

pub(crate) fn read_uint(cursor: &mut Cursor) -> Result<i64> {
    let digits = cursor.read_until_whitespace(None);
    String::from_utf8_lossy(&digits)
        .parse::<i64>()
        .map_err(|_| Error::Parse(crate::error::ParseError::InvalidObject))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indirect_ref_pattern_detected() {
        assert!(matches_reference_pattern(b"3 0 R "));
        assert!(matches_reference_pattern(b"3 0 R"));
        assert!(!matches_reference_pattern(b"3 0 Rabbit"));
        assert!(!matches_reference_pattern(b"3.5"));
    }
}
