use std::collections::HashSet;

use crate::error::ParseError;
use crate::object::ObjectId;
use crate::parser::lexer::Cursor;
use crate::parser::number::{looks_like_reference, read_number, read_reference};
use crate::parser::string::{read_hex_string, read_literal_string};
use crate::reader::Reader;
use crate::{Dictionary, Error, Object, Result, Stream};

/// One-byte-lookahead dispatch on the next non-whitespace byte.
pub(crate) fn read_object(cursor: &mut Cursor) -> Result<Object> {
    let Some(lookahead) = cursor.skip_non_whitespace() else {
        return Err(Error::Parse(ParseError::InvalidObject));
    };

    match lookahead {
        b't' => {
            if cursor.consume(b"true") {
                Ok(Object::Boolean(true))
            } else {
                Err(Error::Parse(ParseError::InvalidObject))
            }
        }
        b'f' => {
            if cursor.consume(b"false") {
                Ok(Object::Boolean(false))
            } else {
                Err(Error::Parse(ParseError::InvalidObject))
            }
        }
        b'n' => {
            if cursor.consume(b"null") {
                Ok(Object::Null)
            } else {
                Err(Error::Parse(ParseError::InvalidObject))
            }
        }
        b'(' => read_literal_string(cursor),
        b'<' => {
            if cursor.peek_at(1) == Some(b'<') {
                read_dictionary_or_stream(cursor, 0, None)
            } else {
                read_hex_string(cursor)
            }
        }
        b'/' => read_name(cursor),
        b'[' => read_array(cursor),
        b'+' | b'-' | b'.' => read_number(cursor),
        b'0'..=b'9' => {
            if looks_like_reference(cursor) {
                read_reference(cursor)
            } else {
                read_number(cursor)
            }
        }
        _ => Err(Error::Parse(ParseError::InvalidObject)),
    }
}

fn read_name(cursor: &mut Cursor) -> Result<Object> {
    if cursor.advance() != Some(b'/') {
        return Err(Error::Parse(ParseError::InvalidObject));
    }
    let bytes = cursor.read_until_whitespace(None);
    Ok(Object::Name(bytes))
}

/// Reads a dictionary that can never be followed by a stream payload (the
/// trailer dictionary).
pub(crate) fn read_plain_dictionary(cursor: &mut Cursor) -> Result<Dictionary> {
    match read_dictionary_or_stream(cursor, 0, None)? {
        Object::Dictionary(dict) => Ok(dict),
        _ => Err(Error::Parse(ParseError::InvalidObject)),
    }
}

fn read_array(cursor: &mut Cursor) -> Result<Object> {
    if cursor.advance() != Some(b'[') {
        return Err(Error::Parse(ParseError::InvalidObject));
    }
    let mut items = Vec::new();
    loop {
        match cursor.skip_non_whitespace() {
            Some(b']') => {
                cursor.advance();
                break;
            }
            Some(_) => items.push(read_object(cursor)?),
            None => return Err(Error::Parse(ParseError::InvalidObject)),
        }
    }
    Ok(Object::Array(items))
}

/// Reads `<< ... >>`, and — if followed by the `stream` keyword — the
/// stream payload too. `offset` is the absolute buffer position `cursor`
/// started at, so a stream's payload can record its absolute start
/// position rather than one relative to the enclosing indirect object.
fn read_dictionary_or_stream(
    cursor: &mut Cursor, offset: usize, reader: Option<(&Reader, &mut HashSet<ObjectId>)>,
) -> Result<Object> {
    if !cursor.consume(b"<<") {
        return Err(Error::Parse(ParseError::InvalidObject));
    }

    let mut dict = Dictionary::new();
    loop {
        match cursor.skip_non_whitespace() {
            Some(b'>') if cursor.peek_at(1) == Some(b'>') => {
                cursor.advance();
                cursor.advance();
                break;
            }
            Some(_) => {
                let key = match read_object(cursor)? {
                    Object::Name(name) => name,
                    _ => return Err(Error::Parse(ParseError::NonNameKey)),
                };
                let value = read_object(cursor)?;
                dict.insert_unique(key, value)?;
            }
            None => return Err(Error::Parse(ParseError::InvalidObject)),
        }
    }

    match reader {
        Some((reader, seen)) if peek_stream_keyword(cursor) => {
            read_stream_payload(cursor, offset, dict, reader, seen)
        }
        _ => Ok(Object::Dictionary(dict)),
    }
}

fn peek_stream_keyword(cursor: &Cursor) -> bool {
    let mut probe = Cursor::new(cursor.remaining());
    probe.skip_non_whitespace();
    probe.starts_with(b"stream")
}

fn read_stream_payload(
    cursor: &mut Cursor, offset: usize, dict: Dictionary, reader: &Reader, seen: &mut HashSet<ObjectId>,
) -> Result<Object> {
    cursor.skip_non_whitespace();
    if !cursor.consume(b"stream") {
        return Err(Error::Parse(ParseError::InvalidObject));
    }
    // Tolerate trailing spaces before the line break that follows `stream`.
    while cursor.peek() == Some(b' ') || cursor.peek() == Some(b'\t') {
        cursor.advance();
    }
    if cursor.consume(b"\r\n") {
        // consumed
    } else if cursor.peek() == Some(b'\n') || cursor.peek() == Some(b'\r') {
        cursor.advance();
    } else {
        return Err(Error::Parse(ParseError::InvalidObject));
    }

    let length = resolve_length(&dict, reader, seen)?;
    let length = usize::try_from(length).map_err(|e| Error::NumericCast(e.to_string()))?;

    let start = offset + cursor.position();
    let remaining = cursor.remaining();
    if length > remaining.len() {
        return Err(Error::Parse(ParseError::MissingStreamLength));
    }
    let mut end = length;

    let bytes = cursor.remaining();
    if !tail_has_endstream(bytes, end) {
        // ReportLab writes a /Length that's one byte short; back up and retry.
        if end > 0 && tail_has_endstream(bytes, end - 1) {
            end -= 1;
        } else {
            return Err(Error::Parse(ParseError::MissingEndstream));
        }
    }

    let payload = bytes[..end].to_vec();
    for _ in 0..end {
        cursor.advance();
    }
    skip_to_endstream(cursor)?;

    Ok(Object::Stream(Stream::new(dict, payload).with_start_position(start)))
}

fn tail_has_endstream(bytes: &[u8], len: usize) -> bool {
    let mut probe = Cursor::new(&bytes[len.min(bytes.len())..]);
    probe.skip_non_whitespace();
    probe.starts_with(b"endstream")
}

fn skip_to_endstream(cursor: &mut Cursor) -> Result<()> {
    cursor.skip_non_whitespace();
    if cursor.consume(b"endstream") {
        Ok(())
    } else {
        Err(Error::Parse(ParseError::MissingEndstream))
    }
}

fn resolve_length(dict: &Dictionary, reader: &Reader, seen: &mut HashSet<ObjectId>) -> Result<i64> {
    match dict.get(b"Length")? {
        Object::Integer(n) => Ok(*n),
        Object::Reference(id) => {
            let obj = reader.get_object(*id, seen)?;
            obj.as_i64()
        }
        _ => Err(Error::Parse(ParseError::MissingStreamLength)),
    }
}

/// Parses `id gen obj ... endobj`, the sole entry point that may produce a
/// `Stream`.
pub(crate) fn parse_indirect_object(
    buf: &[u8], offset: usize, expected_id: Option<ObjectId>, reader: &Reader,
    seen: &mut HashSet<ObjectId>,
) -> Result<(ObjectId, Object)> {
    let mut cursor = Cursor::new(&buf[offset..]);

    cursor.skip_non_whitespace();
    let id = crate::parser::number::read_uint(&mut cursor)? as u32;
    cursor.skip_non_whitespace();
    let generation = crate::parser::number::read_uint(&mut cursor)? as u16;
    cursor.skip_non_whitespace();
    if !cursor.consume(b"obj") {
        return Err(Error::Parse(ParseError::InvalidObjectHeader));
    }

    if let Some(expected) = expected_id {
        if expected != (id, generation) {
            // Trust the xref table's offset over a mismatched header; keep
            // the id the caller already knows about.
        }
    }

    cursor.skip_non_whitespace();
    let object = if cursor.peek() == Some(b'<') && cursor.peek_at(1) == Some(b'<') {
        read_dictionary_or_stream(&mut cursor, offset, Some((reader, seen)))?
    } else {
        read_object(&mut cursor)?
    };

    cursor.skip_non_whitespace();
    let _ = cursor.consume(b"endobj");

    Ok(((id, generation), object))
}
