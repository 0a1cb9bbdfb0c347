use std::collections::{BTreeMap, HashSet};

use crate::object::ObjectId;
use crate::page::Page;
use crate::xref::Xref;
use crate::{Dictionary, Error, Object, Result};

/// A PDF document: the flat, already-resolved object graph produced by
/// [`crate::reader::Reader::read`], plus the cross-reference and trailer
/// bookkeeping the writer's reference sweep needs when importing foreign
/// objects.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub version: String,
    pub max_id: u32,
    pub xref_start: usize,
    pub binary_mark: Vec<u8>,
    pub trailer: Dictionary,
    pub reference_table: Xref,
    pub objects: BTreeMap<ObjectId, Object>,
}

const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn get_object(&self, id: ObjectId) -> Result<&Object> {
        self.objects.get(&id).ok_or(Error::MissingXrefEntry)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects.get_mut(&id).ok_or(Error::MissingXrefEntry)
    }

    pub fn get_dictionary(&self, id: ObjectId) -> Result<&Dictionary> {
        self.get_object(id)?.as_dict()
    }

    /// Follows `object` through any chain of `Reference`s. A direct
    /// (non-reference) object is returned unchanged with a `(0, 0)`
    /// sentinel id.
    pub fn dereference(&self, object: &Object) -> Result<(ObjectId, Object)> {
        let mut current = object.clone();
        let mut last_id = (0, 0);
        let mut seen = HashSet::new();
        loop {
            match current {
                Object::Reference(id) => {
                    if !seen.insert(id) {
                        return Err(Error::ReferenceCycle(id));
                    }
                    last_id = id;
                    current = self.get_object(id)?.clone();
                }
                other => return Ok((last_id, other)),
            }
        }
    }

    pub fn resolve(&self, object: &Object) -> Result<Object> {
        self.dereference(object).map(|(_, obj)| obj)
    }

    pub fn catalog(&self) -> Result<&Dictionary> {
        let root = self.trailer.get(b"Root").and_then(Object::as_reference)?;
        self.get_dictionary(root)
    }

    pub fn is_encrypted(&self) -> bool {
        self.trailer.has(b"Encrypt")
    }

    /// Flattens the page tree rooted at `/Root/Pages`, propagating
    /// inheritable attributes from ancestors to leaves. Returns `(id, dict)`
    /// pairs in document order.
    pub fn flatten_pages(&self) -> Result<Vec<(ObjectId, Dictionary)>> {
        let catalog = self.catalog()?;
        let pages_ref = catalog.get(b"Pages").and_then(Object::as_reference)?;
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.walk_pages(pages_ref, &Dictionary::new(), &mut out, &mut seen)?;
        Ok(out)
    }

    fn walk_pages(
        &self, id: ObjectId, inherited: &Dictionary, out: &mut Vec<(ObjectId, Dictionary)>,
        seen: &mut HashSet<ObjectId>,
    ) -> Result<()> {
        if !seen.insert(id) {
            return Err(Error::ReferenceCycle(id));
        }
        let dict = self.get_dictionary(id)?;

        if dict.has_type(b"Page") {
            let mut page_dict = dict.clone();
            for key in INHERITABLE {
                if !page_dict.has(key) {
                    if let Ok(value) = inherited.get(key) {
                        page_dict.set(key.to_vec(), value.clone());
                    }
                }
            }
            out.push((id, page_dict));
            return Ok(());
        }

        let mut next_inherited = inherited.clone();
        for key in INHERITABLE {
            if let Ok(value) = dict.get(key) {
                next_inherited.set(key.to_vec(), value.clone());
            }
        }

        let kids = dict.get(b"Kids").and_then(Object::as_array)?.clone();
        for kid in kids {
            self.walk_pages(kid.as_reference()?, &next_inherited, out, seen)?;
        }
        Ok(())
    }

    /// Total page count.
    pub fn page_count(&self) -> Result<u32> {
        if self.is_encrypted() {
            return Err(Error::EncryptedDocument);
        }
        Ok(self.flatten_pages()?.len() as u32)
    }

    /// Zero-based page lookup.
    pub fn page(&self, index: usize) -> Result<Page<'_>> {
        if self.is_encrypted() {
            return Err(Error::EncryptedDocument);
        }
        let pages = self.flatten_pages()?;
        let (id, dict) = pages.into_iter().nth(index).ok_or(Error::MissingXrefEntry)?;
        Ok(Page::new(self, id, dict))
    }

    /// 1-based page number to object id, document order.
    pub fn get_pages(&self) -> Result<BTreeMap<u32, ObjectId>> {
        Ok(self
            .flatten_pages()?
            .into_iter()
            .enumerate()
            .map(|(i, (id, _))| ((i + 1) as u32, id))
            .collect())
    }

    fn rotate_page(&mut self, id: ObjectId, delta: i64) -> Result<()> {
        if delta % 90 != 0 {
            return Err(Error::ObjectType("a multiple of 90 degrees"));
        }
        let current_dict = self
            .flatten_pages()?
            .into_iter()
            .find(|(page_id, _)| *page_id == id)
            .map(|(_, dict)| dict)
            .ok_or(Error::MissingXrefEntry)?;
        let current = current_dict.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);
        let new_angle = ((current + delta) % 360 + 360) % 360;

        self.get_object_mut(id)?.as_dict_mut()?.set("Rotate", Object::Integer(new_angle));
        Ok(())
    }

    /// Rotates clockwise by `angle`, which must be a multiple of 90.
    pub fn rotate_page_clockwise(&mut self, id: ObjectId, angle: i64) -> Result<()> {
        self.rotate_page(id, angle)
    }

    /// Rotates counter-clockwise by `angle`.
    pub fn rotate_page_counter_clockwise(&mut self, id: ObjectId, angle: i64) -> Result<()> {
        self.rotate_page(id, -angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary;

    fn simple_document() -> Document {
        let mut doc = Document::new();
        doc.trailer.set("Root", Object::Reference((1, 0)));
        doc.objects.insert((1, 0), Object::Dictionary(dictionary! { "Type" => "Catalog", "Pages" => Object::Reference((2, 0)) }));
        doc.objects.insert(
            (2, 0),
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(vec![Object::Reference((3, 0)), Object::Reference((4, 0))]),
                "Count" => Object::Integer(2),
                "MediaBox" => Object::Array(vec![Object::Integer(0).into(), Object::Integer(0).into(), Object::Integer(612).into(), Object::Integer(792).into()]),
            }),
        );
        doc.objects.insert((3, 0), Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => Object::Reference((2, 0)) }));
        doc.objects.insert((4, 0), Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => Object::Reference((2, 0)) }));
        doc
    }

    #[test]
    fn inheritance_reaches_every_leaf() {
        let doc = simple_document();
        let pages = doc.flatten_pages().unwrap();
        assert_eq!(pages.len(), 2);
        for (_, dict) in &pages {
            assert!(dict.has(b"MediaBox"));
        }
    }

    #[test]
    fn page_count_matches_kids() {
        let doc = simple_document();
        assert_eq!(doc.page_count().unwrap(), 2);
    }

    #[test]
    fn rotate_clockwise_wraps_at_360() {
        let mut doc = simple_document();
        doc.rotate_page_clockwise((3, 0), 270).unwrap();
        doc.rotate_page_clockwise((3, 0), 180).unwrap();
        let rotate = doc.get_dictionary((3, 0)).unwrap().get(b"Rotate").unwrap().as_i64().unwrap();
        assert_eq!(rotate, 90);
    }
}
