//! Lexical primitives and the one-byte-lookahead object parser, plus the
//! xref/trailer and indirect-object entry points the reader drives.
//! `ParserInput` keeps the teacher's `nom_locate`-tagged
//! convention at the public boundary; the recursive descent itself walks a
//! plain byte cursor, since PDF's grammar is dominated by one-byte
//! lookahead dispatch rather than combinator composition.

mod lexer;
mod number;
mod object;
mod string;
mod xref;

use std::collections::HashSet;

use nom::bytes::complete::tag;
use nom::character::complete::{digit1, line_ending};
use nom::combinator::{map, map_res};
use nom::sequence::{preceded, terminated};
use nom::IResult;
use nom_locate::LocatedSpan;

use crate::object::ObjectId;
use crate::reader::Reader;
use crate::{Dictionary, Object, Result, Xref};

pub type ParserInput<'a> = LocatedSpan<&'a [u8], &'a str>;

pub(crate) use lexer::Cursor;
pub(crate) use string::original_bytes;

/// Parses `%PDF-x.y` and returns `"x.y"`.
pub fn header(input: ParserInput) -> Option<String> {
    let buf = input.fragment();
    fn parse(i: &[u8]) -> IResult<&[u8], Vec<u8>> {
        preceded(tag("%PDF-"), map(digit1, |d: &[u8]| d.to_vec()))(i)
    }
    let (rest, major) = parse(buf).ok()?;
    let rest = rest.strip_prefix(b".")?;
    let (_, minor) = digit1::<_, nom::error::Error<&[u8]>>(rest).ok()?;
    Some(format!("{}.{}", String::from_utf8_lossy(&major), String::from_utf8_lossy(minor)))
}

/// Parses the binary-mark comment line (four-plus high bytes after `%`)
/// that conventionally follows the header on line two.
pub fn binary_mark(input: ParserInput) -> Option<Vec<u8>> {
    let buf = input.fragment();
    let line = match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(pos) => &buf[..pos],
        None => buf,
    };
    let line = line.strip_prefix(b"%")?;
    if line.len() >= 4 && line.iter().all(|&b| b >= 128) {
        Some(line.to_vec())
    } else {
        None
    }
}

/// Parses `startxref\n<offset>` and returns the offset.
pub fn xref_start(input: ParserInput) -> Option<i64> {
    let buf = input.fragment();
    fn parse(i: &[u8]) -> IResult<&[u8], i64> {
        preceded(
            terminated(tag("startxref"), lexer::whitespace0),
            map_res(digit1, |d: &[u8]| String::from_utf8_lossy(d).parse::<i64>()),
        )(i)
    }
    parse(buf).ok().map(|(_, offset)| offset)
}

/// Reads one xref segment (classic table or xref stream) and its trailer
/// dictionary, starting at `input`.
pub fn xref_and_trailer(input: ParserInput, reader: &Reader) -> Result<(Xref, Dictionary)> {
    let buf = input.fragment();
    xref::parse_segment(buf, reader)
}

/// Parses one indirect object: `id gen obj ... endobj`, detecting a
/// trailing `stream`/`endstream` pair.
pub fn indirect_object(
    input: ParserInput, offset: usize, expected_id: Option<ObjectId>, reader: &Reader,
    seen: &mut HashSet<ObjectId>,
) -> Result<(ObjectId, Object)> {
    object::parse_indirect_object(input.fragment(), offset, expected_id, reader, seen)
}

/// Parses a single object with no surrounding `id gen obj` header — used for
/// bodies inside an `/ObjStm` and for array/dictionary elements.
pub fn parse_object(buf: &[u8]) -> Result<(Object, usize)> {
    let mut cursor = Cursor::new(buf);
    let obj = object::read_object(&mut cursor)?;
    Ok((obj, cursor.position()))
}

pub(crate) fn line_ending_or_eof(i: &[u8]) -> IResult<&[u8], &[u8]> {
    if i.is_empty() {
        Ok((i, i))
    } else {
        line_ending(i)
    }
}
