//! `Reader::read` drives the whole load: locate `startxref`, follow the
//! `/Prev` chain merging xref segments "earliest wins", then materialise
//! every object the merged table names.

mod load;
mod metadata;
mod object_loader;

#[cfg(test)]
mod tests;

use log::warn;
use std::cmp;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{ParseError, XrefError};
use crate::object_stream::ObjectStream;
use crate::parser::{self, ParserInput};
use crate::xref::XrefEntry;
use crate::{Document, Error, Result};

pub use metadata::PdfMetadata;

/// Maximum nesting depth a literal string's balanced parens may reach
/// before parsing gives up.
pub const MAX_BRACKET: usize = 100;

/// Borrows the whole file and accumulates the [`Document`] being built.
/// Lives only for the duration of [`Reader::read`]; nothing about it
/// survives into the returned `Document`.
pub struct Reader<'a> {
    pub buffer: &'a [u8],
    pub document: Document,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Reader { buffer, document: Document::new() }
    }

    /// Reads the whole document.
    pub fn read(mut self) -> Result<Document> {
        let offset = self.buffer.windows(5).position(|w| w == b"%PDF-").unwrap_or(0);
        self.buffer = &self.buffer[offset..];

        // document <- header indirect_object* xref trailer xref_start
        let version =
            parser::header(ParserInput::new_extra(self.buffer, "header")).ok_or(ParseError::InvalidFileHeader)?;

        // The binary mark conventionally sits on line two.
        if let Some(pos) = self.buffer.iter().position(|&byte| byte == b'\n') {
            if let Some(binary_mark) =
                parser::binary_mark(ParserInput::new_extra(&self.buffer[pos + 1..], "binary_mark"))
            {
                self.document.binary_mark = binary_mark;
            }
        }

        let xref_start = Self::get_xref_start(self.buffer)?;
        if xref_start > self.buffer.len() {
            return Err(Error::Xref(XrefError::Start));
        }
        self.document.xref_start = xref_start;

        let (mut xref, mut trailer) =
            parser::xref_and_trailer(ParserInput::new_extra(&self.buffer[xref_start..], "xref"), &self)?;

        // Linearized or incrementally-updated documents chain earlier
        // xref sections through /Prev; an id already present always wins
        // over the one a /Prev segment offers.
        let mut already_seen = HashSet::new();
        let mut prev_xref_start = trailer.remove(b"Prev");
        while let Some(prev) = prev_xref_start.and_then(|offset| offset.as_i64().ok()) {
            if already_seen.contains(&prev) {
                break;
            }
            already_seen.insert(prev);
            if prev < 0 || prev as usize > self.buffer.len() {
                return Err(Error::Xref(XrefError::PrevStart));
            }

            let (prev_xref, prev_trailer) =
                parser::xref_and_trailer(ParserInput::new_extra(&self.buffer[prev as usize..], ""), &self)?;
            xref.merge(prev_xref);
            trailer.merge_missing(&prev_trailer);

            // Hybrid-reference files carry a classic table plus a
            // companion xref stream named by /XRefStm.
            let prev_xref_stream_start = trailer.remove(b"XRefStm");
            if let Some(prev) = prev_xref_stream_start.and_then(|offset| offset.as_i64().ok()) {
                if prev < 0 || prev as usize > self.buffer.len() {
                    return Err(Error::Xref(XrefError::StreamStart));
                }
                let (prev_xref, _) =
                    parser::xref_and_trailer(ParserInput::new_extra(&self.buffer[prev as usize..], ""), &self)?;
                xref.merge(prev_xref);
            }

            prev_xref_start = prev_trailer.get(b"Prev").cloned().ok();
        }

        let xref_entry_count = xref.max_id().checked_add(1).ok_or(ParseError::InvalidXref)?;
        if xref.size != xref_entry_count {
            warn!("trailer /Size is {}, correcting to {}", xref.size, xref_entry_count);
            xref.size = xref_entry_count;
        }

        self.document.version = version;
        self.document.max_id = xref.size.saturating_sub(1);
        self.document.trailer = trailer;
        self.document.reference_table = xref;

        if self.document.is_encrypted() {
            return Err(Error::EncryptedDocument);
        }

        self.load_objects()?;
        Ok(self.document)
    }

    /// Materialises every entry in the merged xref table into
    /// `self.document.objects`. Normal entries are parsed at their offset;
    /// compressed entries are recovered by decoding their containing
    /// `/ObjStm` once and fanning its contents out.
    fn load_objects(&mut self) -> Result<()> {
        let zero_length_streams = Mutex::new(Vec::new());
        let object_streams = Mutex::new(Vec::new());

        let entries_filter_map = |(_, entry): (&_, &_)| {
            let XrefEntry::Normal { offset, .. } = *entry else { return None };

            let (object_id, object) = match self.read_object(offset as usize, None, &mut HashSet::new()) {
                Ok(result) => result,
                Err(e) => {
                    warn!("object load error at offset {offset}: {e}");
                    return None;
                }
            };

            if let Ok(stream) = object.as_stream() {
                if stream.dict.has_type(b"ObjStm") {
                    match ObjectStream::new(stream) {
                        Ok(obj_stream) => {
                            object_streams.lock().expect("mutex poisoned").extend(obj_stream.objects);
                        }
                        Err(e) => warn!("object stream {object_id:?} could not be decoded: {e}"),
                    }
                } else if stream.content.is_empty() {
                    zero_length_streams.lock().expect("mutex poisoned").push(object_id);
                }
            }

            Some((object_id, object))
        };

        #[cfg(feature = "rayon")]
        {
            self.document.objects =
                self.document.reference_table.entries.par_iter().filter_map(entries_filter_map).collect();
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.document.objects =
                self.document.reference_table.entries.iter().filter_map(entries_filter_map).collect();
        }

        // First definition wins for an id defined both loose and inside
        // an /ObjStm.
        let object_streams: BTreeMap<_, _> = object_streams.into_inner().expect("mutex poisoned").into_iter().collect();
        for (id, object) in object_streams {
            self.document.objects.entry(id).or_insert(object);
        }

        for object_id in zero_length_streams.into_inner().expect("mutex poisoned") {
            let _ = self.read_stream_content(object_id);
        }

        Ok(())
    }

    fn get_xref_start(buffer: &[u8]) -> Result<usize> {
        let seek_pos = buffer.len() - cmp::min(buffer.len(), 512);
        Self::search_substring(buffer, b"%%EOF", seek_pos)
            .and_then(|eof_pos| if eof_pos > 25 { Some(eof_pos) } else { None })
            .and_then(|eof_pos| Self::search_substring(buffer, b"startxref", eof_pos - 25))
            .ok_or(Error::Xref(XrefError::Start))
            .and_then(|xref_pos| {
                if xref_pos <= buffer.len() {
                    parser::xref_start(ParserInput::new_extra(&buffer[xref_pos..], "xref"))
                        .map(|offset| offset as usize)
                        .ok_or(Error::Xref(XrefError::Start))
                } else {
                    Err(Error::Xref(XrefError::Start))
                }
            })
    }

    pub(crate) fn search_substring(buffer: &[u8], pattern: &[u8], start_pos: usize) -> Option<usize> {
        buffer
            .get(start_pos..)?
            .windows(pattern.len())
            .rposition(|window| window == pattern)
            .map(|pos| start_pos + pos)
    }
}
