//! Page-level accessors: rectangle fallback chains and rotation, modeled
//! after pyPdf's `PageObject`.

use crate::document::Document;
use crate::object::ObjectId;
use crate::{Dictionary, Error, Object, Result};

/// A flattened page: its own dictionary already carries every inheritable
/// attribute it didn't override. Borrows the owning [`Document`]
/// so rectangle accessors can resolve indirect array elements.
pub struct Page<'a> {
    document: &'a Document,
    id: ObjectId,
    dict: Dictionary,
}

impl<'a> Page<'a> {
    pub(crate) fn new(document: &'a Document, id: ObjectId, dict: Dictionary) -> Self {
        Page { document, id, dict }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn document(&self) -> &'a Document {
        self.document
    }

    /// Stable identity for the owning document, used by [`crate::Writer`]
    /// to key its per-source-document remap table when importing foreign
    /// objects when writing.
    pub(crate) fn document_key(&self) -> usize {
        self.document as *const Document as usize
    }

    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    fn rectangle(&self, key: &[u8]) -> Result<[f64; 4]> {
        let value = self.dict.get(key)?;
        let array = self.document.resolve(value)?;
        let array = array.as_array()?;
        if array.len() != 4 {
            return Err(Error::ObjectType("Rectangle"));
        }
        let mut out = [0.0; 4];
        for (slot, item) in out.iter_mut().zip(array.iter()) {
            *slot = self.document.resolve(item)?.as_f64()?;
        }
        Ok(out)
    }

    pub fn media_box(&self) -> Result<[f64; 4]> {
        self.rectangle(b"MediaBox")
    }

    pub fn crop_box(&self) -> Result<[f64; 4]> {
        self.rectangle(b"CropBox").or_else(|_| self.media_box())
    }

    pub fn bleed_box(&self) -> Result<[f64; 4]> {
        self.rectangle(b"BleedBox").or_else(|_| self.crop_box())
    }

    pub fn trim_box(&self) -> Result<[f64; 4]> {
        self.rectangle(b"TrimBox").or_else(|_| self.crop_box())
    }

    pub fn art_box(&self) -> Result<[f64; 4]> {
        self.rectangle(b"ArtBox").or_else(|_| self.crop_box())
    }

    pub fn rotation(&self) -> i64 {
        self.dict.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary;

    fn page_with_media_box() -> (Document, ObjectId) {
        let mut doc = Document::new();
        doc.trailer.set("Root", Object::Reference((1, 0)));
        doc.objects.insert((1, 0), Object::Dictionary(dictionary! { "Type" => "Catalog", "Pages" => Object::Reference((2, 0)) }));
        doc.objects.insert(
            (2, 0),
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(vec![Object::Reference((3, 0))]),
                "Count" => Object::Integer(1),
                "MediaBox" => Object::Array(vec![0.0.into(), 0.0.into(), 612.0.into(), 792.0.into()]),
            }),
        );
        doc.objects.insert((3, 0), Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => Object::Reference((2, 0)) }));
        (doc, (3, 0))
    }

    #[test]
    fn crop_box_falls_back_to_media_box() {
        let (doc, _) = page_with_media_box();
        let page = doc.page(0).unwrap();
        assert_eq!(page.crop_box().unwrap(), [0.0, 0.0, 612.0, 792.0]);
        assert_eq!(page.bleed_box().unwrap(), page.crop_box().unwrap());
    }

    #[test]
    fn rotation_defaults_to_zero() {
        let (doc, _) = page_with_media_box();
        let page = doc.page(0).unwrap();
        assert_eq!(page.rotation(), 0);
    }
}
