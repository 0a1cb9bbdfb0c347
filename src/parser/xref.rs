use std::collections::HashSet;

use crate::error::XrefError;
use crate::object::Object;
use crate::parser::lexer::Cursor;
use crate::parser::object::{self, parse_indirect_object};
use crate::reader::Reader;
use crate::xref::{Xref, XrefEntry};
use crate::{Dictionary, Error, Result};

/// Reads one xref segment — classic table or xref stream — and its
/// trailer. Both representations may be chained via `/Prev`; the caller
/// (`Reader::read`) drives that loop.
pub(crate) fn parse_segment(buf: &[u8], reader: &Reader) -> Result<(Xref, Dictionary)> {
    let mut probe = Cursor::new(buf);
    match probe.skip_non_whitespace() {
        Some(b'x') => parse_classic_table(buf),
        Some(_) => parse_xref_stream(buf, reader),
        None => Err(Error::Xref(XrefError::Start)),
    }
}

fn parse_classic_table(buf: &[u8]) -> Result<(Xref, Dictionary)> {
    let mut cursor = Cursor::new(buf);
    cursor.skip_non_whitespace();
    if !cursor.consume(b"xref") {
        return Err(Error::Xref(XrefError::Parse));
    }

    let mut xref = Xref::new(0);

    loop {
        cursor.skip_non_whitespace();
        if cursor.starts_with(b"trailer") {
            break;
        }
        let first_id = read_uint(&mut cursor)?;
        cursor.skip_non_whitespace();
        let count = read_uint(&mut cursor)?;

        // Skip to the start of the fixed-width entry block.
        while matches!(cursor.peek(), Some(b' ') | Some(b'\t')) {
            cursor.advance();
        }
        if cursor.consume(b"\r\n") {
        } else if matches!(cursor.peek(), Some(b'\n') | Some(b'\r')) {
            cursor.advance();
        }

        for i in 0..count {
            let entry_bytes = cursor.remaining();
            if entry_bytes.len() < 18 {
                return Err(Error::Xref(XrefError::Parse));
            }
            let offset_str = std::str::from_utf8(&entry_bytes[0..10]).map_err(|_| Error::Xref(XrefError::Parse))?;
            let gen_str = std::str::from_utf8(&entry_bytes[11..16]).map_err(|_| Error::Xref(XrefError::Parse))?;
            let flag = entry_bytes[17];

            let offset: u32 = offset_str.trim().parse().map_err(|_| Error::Xref(XrefError::Parse))?;
            let generation: u16 = gen_str.trim().parse().map_err(|_| Error::Xref(XrefError::Parse))?;

            let id = first_id as u32 + i as u32;
            let entry = match flag {
                b'n' => XrefEntry::Normal { offset, generation },
                b'f' => XrefEntry::Free { next_free: offset },
                _ => return Err(Error::Xref(XrefError::Parse)),
            };
            xref.entries.entry(id).or_insert(entry);

            // Consume the 20-byte record (tolerating 19-byte variants).
            let consumed = entry_bytes.len().min(20);
            for _ in 0..consumed {
                if entry_bytes[0] == b'\n' || entry_bytes[0] == b'\r' {
                    break;
                }
                cursor.advance();
                if cursor.position() >= buf.len() {
                    break;
                }
            }
            cursor.skip_non_whitespace();
        }
    }

    cursor.skip_non_whitespace();
    if !cursor.consume(b"trailer") {
        return Err(Error::Xref(XrefError::TrailerParse));
    }
    cursor.skip_non_whitespace();
    let trailer = object::read_plain_dictionary(&mut cursor)?;
    if let Ok(size) = trailer.get(b"Size").and_then(Object::as_i64) {
        xref.size = size.max(0) as u32;
    }

    Ok((xref, trailer))
}

fn parse_xref_stream(buf: &[u8], reader: &Reader) -> Result<(Xref, Dictionary)> {
    let (_, object) = parse_indirect_object(buf, 0, None, reader, &mut HashSet::new())?;
    let stream = object.as_stream()?;
    if !stream.dict.has_type(b"XRef") {
        return Err(Error::Xref(XrefError::UnsupportedType));
    }

    let widths: Vec<usize> = stream
        .dict
        .get(b"W")
        .map_err(|_| Error::Xref(XrefError::MissingW))?
        .as_array()?
        .iter()
        .map(|o| o.as_i64().map(|n| n as usize))
        .collect::<Result<_>>()?;
    if widths.len() != 3 {
        return Err(Error::Xref(XrefError::MalformedW));
    }

    let size = stream.dict.get(b"Size").and_then(Object::as_i64).unwrap_or(0);
    let index: Vec<(u32, u32)> = match stream.dict.get(b"Index").and_then(Object::as_array) {
        Ok(array) => array
            .chunks(2)
            .filter_map(|pair| match pair {
                [first, count] => Some((first.as_i64().ok()? as u32, count.as_i64().ok()? as u32)),
                _ => None,
            })
            .collect(),
        Err(_) => vec![(0, size.max(0) as u32)],
    };

    let data = stream.decompressed_content()?;
    let entry_len = widths.iter().sum::<usize>();
    if entry_len == 0 {
        return Err(Error::Xref(XrefError::MalformedW));
    }

    let mut xref = Xref::new(size.max(0) as u32);
    let mut cursor = 0usize;
    for (first_id, count) in index {
        for i in 0..count {
            if cursor + entry_len > data.len() {
                break;
            }
            let fields = read_fields(&data[cursor..cursor + entry_len], &widths);
            cursor += entry_len;

            let id = first_id + i;
            let entry = match fields[0] {
                0 => XrefEntry::Free { next_free: fields[1] as u32 },
                1 => XrefEntry::Normal { offset: fields[1] as u32, generation: fields[2] as u16 },
                2 => XrefEntry::Compressed { container: fields[1] as u32, index: fields[2] as u32 },
                _ => continue,
            };
            xref.entries.entry(id).or_insert(entry);
        }
    }

    Ok((xref, stream.dict.clone()))
}

/// Default a missing field-0 width to type 1, per ISO 32000-1 7.5.8.2.
fn read_fields(entry: &[u8], widths: &[usize]) -> [i64; 3] {
    let mut fields = [1i64, 0, 0];
    let mut offset = 0;
    for (i, &width) in widths.iter().enumerate() {
        if width == 0 {
            continue;
        }
        let mut value: i64 = 0;
        for &byte in &entry[offset..offset + width] {
            value = (value << 8) | byte as i64;
        }
        fields[i] = value;
        offset += width;
    }
    fields
}

fn read_uint(cursor: &mut Cursor) -> Result<i64> {
    let digits = cursor.read_until_whitespace(None);
    std::str::from_utf8(&digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(Error::Xref(XrefError::Parse))
}
