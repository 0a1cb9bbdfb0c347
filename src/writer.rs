//! PDF-1.3 output: a fresh object table seeded with `/Pages`,
//! `/Info` and `/Root`, a reference sweep that imports whatever subtree
//! [`Writer::add_page`] reaches from a source [`Document`], and a writer
//! that emits a classic (non-stream) xref table.
//!
//! Foreign objects are imported eagerly at `add_page` time rather than
//! deferred to [`Writer::write`]: a source document's reference graph
//! only ever points back into that same document, so importing as each
//! page is added gives the same result as a deferred sweep without
//! needing to keep a borrow of every source `Document` alive until
//! `write` runs.

use std::collections::HashMap;
use std::io::Write as IoWrite;

use crate::object::{ObjectId, StringProvenance};
use crate::page::Page;
use crate::{Dictionary, Document, Error, Object, Result, Stream};

/// Builds a new PDF file from pages pulled out of one or more source
/// [`Document`]s.
pub struct Writer {
    objects: Vec<Object>,
    pages_id: ObjectId,
    info_id: ObjectId,
    root_id: ObjectId,
    // Per-source-document remap: (source document identity) -> (source
    // object id -> local object id). Keyed by pointer identity since a
    // merge may pull pages from several distinct source documents.
    remaps: HashMap<usize, HashMap<ObjectId, ObjectId>>,
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        let mut objects = Vec::new();
        objects.push(Object::Dictionary(crate::dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(Vec::new()),
            "Count" => Object::Integer(0),
        }));
        objects.push(Object::Dictionary(Dictionary::new()));
        objects.push(Object::Dictionary(crate::dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference((1, 0)),
        }));

        Writer { objects, pages_id: (1, 0), info_id: (2, 0), root_id: (3, 0), remaps: HashMap::new() }
    }

    fn reserve_slot(&mut self) -> ObjectId {
        self.objects.push(Object::Null);
        (self.objects.len() as u32, 0)
    }

    fn slot_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0 as usize - 1]
    }

    /// The `/Info` dictionary of the output file, for callers that want to
    /// set `/Title`, `/Producer`, etc. before writing.
    pub fn info_mut(&mut self) -> &mut Dictionary {
        self.slot_mut(self.info_id).as_dict_mut().expect("Info slot is always a Dictionary")
    }

    pub fn page_count(&self) -> usize {
        self.objects[self.pages_id.0 as usize - 1]
            .as_dict()
            .ok()
            .and_then(|d| d.get(b"Count").ok())
            .and_then(Object::as_i64)
            .map(|n| n as usize)
            .unwrap_or(0)
    }

    /// Imports `page`'s subtree from its owning document and appends it to
    /// the output page tree. Resource renaming is out of scope; callers
    /// are expected to pull pages whose resource names don't collide.
    pub fn add_page(&mut self, page: &Page) -> Result<ObjectId> {
        if !page.dict().has_type(b"Page") {
            return Err(Error::NotAPage);
        }

        let doc_key = page.document_key();
        let local_id = self.import_object(page.document(), doc_key, page.id())?;

        self.slot_mut(local_id).as_dict_mut()?.set("Parent", Object::Reference(self.pages_id));

        let pages_dict = self.slot_mut(self.pages_id).as_dict_mut()?;
        pages_dict.get_mut(b"Kids")?.as_array_mut()?.push(Object::Reference(local_id));
        let count = pages_dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages_dict.set("Count", Object::Integer(count + 1));

        Ok(local_id)
    }

    /// Imports `id` from `document`, recursively importing every object it
    /// reaches. A slot is reserved, and its remap entry recorded, before
    /// descending into it, so that a cycle (e.g. a `/Parent` back-pointer)
    /// resolves to that same local id on re-entry instead of recursing
    /// forever.
    fn import_object(&mut self, document: &Document, doc_key: usize, id: ObjectId) -> Result<ObjectId> {
        if let Some(local) = self.remaps.entry(doc_key).or_default().get(&id) {
            return Ok(*local);
        }

        let local_id = self.reserve_slot();
        self.remaps.entry(doc_key).or_default().insert(id, local_id);

        let object = document.get_object(id)?.clone();
        let imported = self.sweep(document, doc_key, object)?;
        *self.slot_mut(local_id) = imported;

        Ok(local_id)
    }

    /// Recursively rewrites every `Reference` found in `object` to point at
    /// its imported local id, hoisting any directly-embedded `Stream` into
    /// its own indirect object along the way.
    fn sweep(&mut self, document: &Document, doc_key: usize, object: Object) -> Result<Object> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.import_object(document, doc_key, id)?)),
            Object::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.hoist_or_sweep(document, doc_key, item)?);
                }
                Ok(Object::Array(out))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.hoist_or_sweep(document, doc_key, std::mem::take(value))?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(stream) => {
                let dict = self.sweep_dict(document, doc_key, stream.dict)?;
                Ok(Object::Stream(Stream::new(dict, stream.content)))
            }
            other => Ok(other),
        }
    }

    fn sweep_dict(&mut self, document: &Document, doc_key: usize, dict: Dictionary) -> Result<Dictionary> {
        match self.sweep(document, doc_key, Object::Dictionary(dict))? {
            Object::Dictionary(dict) => Ok(dict),
            _ => unreachable!("sweeping a Dictionary always returns a Dictionary"),
        }
    }

    /// A `Stream` reached directly (not through a `Reference`) has no id
    /// of its own; give it one so the output stays a flat object table.
    fn hoist_or_sweep(&mut self, document: &Document, doc_key: usize, value: Object) -> Result<Object> {
        match value {
            Object::Stream(stream) => {
                let local_id = self.reserve_slot();
                let dict = self.sweep_dict(document, doc_key, stream.dict)?;
                *self.slot_mut(local_id) = Object::Stream(Stream::new(dict, stream.content));
                Ok(Object::Reference(local_id))
            }
            other => self.sweep(document, doc_key, other),
        }
    }

    /// Emits `%PDF-1.3` output: every object, a classic xref table, and a
    /// trailer.
    pub fn write<W: IoWrite>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(b"%PDF-1.3\n")?;

        let mut offsets = Vec::with_capacity(self.objects.len());
        let mut position = 9usize;

        for (i, object) in self.objects.iter().enumerate() {
            let id = (i + 1) as u32;
            offsets.push(position);

            let mut buf = Vec::new();
            write!(buf, "{id} 0 obj\n")?;
            write_object(&mut buf, object)?;
            buf.extend_from_slice(b"\nendobj\n");

            position += buf.len();
            sink.write_all(&buf)?;
        }

        let xref_offset = position;
        let size = self.objects.len() as u32 + 1;
        let mut xref = Vec::new();
        write!(xref, "xref\n0 {size}\n")?;
        xref.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            write!(xref, "{offset:010} 00000 n \n")?;
        }
        sink.write_all(&xref)?;

        sink.write_all(b"trailer\n")?;
        let mut trailer = Dictionary::new();
        trailer.set("Size", Object::Integer(size as i64));
        trailer.set("Root", Object::Reference(self.root_id));
        trailer.set("Info", Object::Reference(self.info_id));
        write_object(sink, &Object::Dictionary(trailer))?;

        write!(sink, "\nstartxref\n{xref_offset}\n%%EOF\n")?;
        Ok(())
    }
}

fn write_object<W: IoWrite>(sink: &mut W, object: &Object) -> Result<()> {
    match object {
        Object::Null => sink.write_all(b"null")?,
        Object::Boolean(b) => sink.write_all(if *b { b"true" } else { b"false" })?,
        Object::Integer(i) => {
            let mut buf = itoa::Buffer::new();
            sink.write_all(buf.format(*i).as_bytes())?;
        }
        Object::Real(r) => sink.write_all(r.lexeme().as_bytes())?,
        Object::Name(name) => {
            sink.write_all(b"/")?;
            sink.write_all(name)?;
        }
        Object::ByteString(bytes) => write_literal_string(sink, bytes)?,
        Object::TextString(text, _) => match crate::encodings::encode(text) {
            Some(bytes) => write_literal_string(sink, &bytes)?,
            None => write_hex_utf16(sink, text)?,
        },
        Object::Array(items) => {
            sink.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    sink.write_all(b" ")?;
                }
                write_object(sink, item)?;
            }
            sink.write_all(b"]")?;
        }
        Object::Dictionary(dict) => write_dictionary(sink, dict)?,
        Object::Stream(stream) => {
            let mut dict = stream.dict.clone();
            dict.set("Length", Object::Integer(stream.content.len() as i64));
            write_dictionary(sink, &dict)?;
            sink.write_all(b"\nstream\n")?;
            sink.write_all(&stream.content)?;
            sink.write_all(b"\nendstream")?;
        }
        Object::Reference(id) => write!(sink, "{} {} R", id.0, id.1)?,
    }
    Ok(())
}

fn write_dictionary<W: IoWrite>(sink: &mut W, dict: &Dictionary) -> Result<()> {
    sink.write_all(b"<<")?;
    for (key, value) in dict.iter() {
        sink.write_all(b"/")?;
        sink.write_all(key)?;
        sink.write_all(b" ")?;
        write_object(sink, value)?;
        sink.write_all(b" ")?;
    }
    sink.write_all(b">>")?;
    Ok(())
}

/// Every byte outside `{space, A-Z, a-z}` is written as a 3-digit octal
/// escape: the conservative literal-string encoding.
fn write_literal_string<W: IoWrite>(sink: &mut W, bytes: &[u8]) -> Result<()> {
    sink.write_all(b"(")?;
    for &byte in bytes {
        if byte == b' ' || byte.is_ascii_alphabetic() {
            sink.write_all(&[byte])?;
        } else {
            write!(sink, "\\{byte:03o}")?;
        }
    }
    sink.write_all(b")")?;
    Ok(())
}

/// A `TextString` that cannot round-trip through PDFDocEncoding is written
/// as a hex string with a UTF-16BE BOM.
fn write_hex_utf16<W: IoWrite>(sink: &mut W, text: &str) -> Result<()> {
    let bytes = crate::parser::original_bytes(text, StringProvenance::Utf16Be)?;
    sink.write_all(b"<")?;
    for byte in bytes {
        write!(sink, "{byte:02X}")?;
    }
    sink.write_all(b">")?;
    Ok(())
}


#[cfg(test)]
mod round_trip_properties {
    use proptest::prelude::*;

    use super::write_object;
    use crate::object::RealNumber;
    use crate::parser::parse_object;
    use crate::Object;

    fn name_strategy() -> impl Strategy<Value = Vec<u8>> {
        "[A-Za-z][A-Za-z0-9]{0,15}".prop_map(|s| s.into_bytes())
    }

    fn scalar_object_strategy() -> impl Strategy<Value = Object> {
        prop_oneof![
            Just(Object::Null),
            any::<bool>().prop_map(Object::Boolean),
            any::<i32>().prop_map(|n| Object::Integer(n as i64)),
            (any::<i32>(), 1u32..3).prop_map(|(n, decimals)| {
                Object::Real(RealNumber::from_lexeme(format!("{n}.{:0width$}", 0, width = decimals as usize)))
            }),
            name_strategy().prop_map(Object::Name),
        ]
    }

    proptest! {
        /// Spec §8 "Round-trip": for every object that does not contain
        /// indirect references, `parse(serialize(O)) == O` component-wise.
        #[test]
        fn scalar_objects_round_trip(object in scalar_object_strategy()) {
            let mut bytes = Vec::new();
            write_object(&mut bytes, &object).unwrap();
            let (parsed, _) = parse_object(&bytes).unwrap();
            prop_assert_eq!(parsed, object);
        }

        #[test]
        fn arrays_of_scalars_round_trip(items in proptest::collection::vec(scalar_object_strategy(), 0..8)) {
            let object = Object::Array(items);
            let mut bytes = Vec::new();
            write_object(&mut bytes, &object).unwrap();
            let (parsed, _) = parse_object(&bytes).unwrap();
            prop_assert_eq!(parsed, object);
        }
    }
}
