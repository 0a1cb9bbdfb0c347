//! Lightweight metadata extraction (SPEC_FULL §10.5, supplemented from
//! `original_source/pyPdf`'s `DocumentInformation`): reads the `/Info`
//! dictionary and counts pages without flattening the whole page tree or
//! materialising every object in the document.

use std::collections::HashSet;

use super::Reader;
use crate::error::{ParseError, XrefError};
use crate::parser::{self, ParserInput};
use crate::{Dictionary, Error, Object, ObjectId, Result};

/// PDF metadata extracted without loading the entire document.
#[derive(Debug, Clone, Default)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: u32,
    pub version: String,
}

impl Reader<'_> {
    /// Reads the trailer, `/Info` dictionary and page count, skipping the
    /// eager load of every object in the document.
    pub fn read_metadata(mut self) -> Result<PdfMetadata> {
        let offset = self.buffer.windows(5).position(|w| w == b"%PDF-").unwrap_or(0);
        self.buffer = &self.buffer[offset..];

        let version =
            parser::header(ParserInput::new_extra(self.buffer, "header")).ok_or(ParseError::InvalidFileHeader)?;

        let xref_start = Reader::get_xref_start(self.buffer)?;
        if xref_start > self.buffer.len() {
            return Err(Error::Xref(XrefError::Start));
        }

        let (mut xref, mut trailer) =
            parser::xref_and_trailer(ParserInput::new_extra(&self.buffer[xref_start..], "xref"), &self)?;

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
            prev_xref_start = prev_trailer.get(b"Prev").cloned().ok();
        }

        self.document.reference_table = xref;
        self.document.trailer = trailer;

        if self.document.is_encrypted() {
            return Err(Error::EncryptedDocument);
        }

        let info = self.extract_info_dict();
        let page_count = self.extract_page_count().unwrap_or(0);

        Ok(PdfMetadata {
            title: Self::string_field(&info, b"Title"),
            author: Self::string_field(&info, b"Author"),
            subject: Self::string_field(&info, b"Subject"),
            keywords: Self::string_field(&info, b"Keywords"),
            creator: Self::string_field(&info, b"Creator"),
            producer: Self::string_field(&info, b"Producer"),
            creation_date: Self::string_field(&info, b"CreationDate"),
            modification_date: Self::string_field(&info, b"ModDate"),
            page_count,
            version,
        })
    }

    fn extract_info_dict(&self) -> Dictionary {
        let Ok(info_id) = self.document.trailer.get(b"Info").and_then(Object::as_reference) else {
            return Dictionary::new();
        };
        let mut seen = HashSet::new();
        self.get_object(info_id, &mut seen)
            .ok()
            .and_then(|obj| obj.as_dict().ok().cloned())
            .unwrap_or_default()
    }

    fn string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
        match dict.get(key).ok()? {
            Object::TextString(text, _) => Some(text.clone()),
            Object::ByteString(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
            _ => None,
        }
    }

    fn extract_page_count(&self) -> Result<u32> {
        let root_ref = self.document.trailer.get(b"Root").and_then(Object::as_reference)?;
        let mut seen = HashSet::new();
        let catalog = self.get_object(root_ref, &mut seen)?;
        let pages_ref = catalog.as_dict()?.get(b"Pages").and_then(Object::as_reference)?;
        self.count_pages(pages_ref, &mut HashSet::new())
    }

    fn count_pages(&self, id: ObjectId, seen: &mut HashSet<ObjectId>) -> Result<u32> {
        if !seen.insert(id) {
            return Err(Error::ReferenceCycle(id));
        }

        let mut already_seen = HashSet::new();
        let dict = self.get_object(id, &mut already_seen)?.as_dict()?.clone();

        match dict.get_type() {
            Ok(b"Page") => Ok(1),
            Ok(b"Pages") => {
                if let Ok(count) = dict.get(b"Count").and_then(Object::as_i64) {
                    if count >= 0 {
                        return Ok(count as u32);
                    }
                }
                let kids = dict.get(b"Kids").and_then(Object::as_array)?;
                let mut total = 0;
                for kid in kids {
                    if let Ok(kid_ref) = kid.as_reference() {
                        total += self.count_pages(kid_ref, seen).unwrap_or(0);
                    }
                }
                Ok(total)
            }
            _ => Ok(1),
        }
    }
}
