//! Named destinations: a thin walk of the `/Names` tree rooted at the
//! catalog (kept from the teacher's `destinations.rs`, SPEC_FULL §10.5).

use indexmap::IndexMap;

use crate::{Dictionary, Document, Object, Result};

#[derive(Debug, Clone)]
pub struct Destination(Dictionary);

impl Destination {
    pub fn new(title: Object, page: Object, typ: Object) -> Self {
        let mut dict = Dictionary::new();
        dict.set(b"Title", title);
        dict.set(b"Page", page);
        dict.set(b"Type", typ);
        Destination(dict)
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Vec<u8>>,
        V: Into<Object>,
    {
        self.0.set(key, value);
    }

    pub fn title(&self) -> Result<&Object> {
        self.0.get(b"Title")
    }

    pub fn page(&self) -> Result<&Object> {
        self.0.get(b"Page")
    }
}

impl Document {
    /// Walks a `/Names` tree (`/Kids` of intermediate nodes, `/Names`
    /// key/value pairs at leaves) collecting named destinations.
    pub fn get_named_destinations(
        &self, tree: &Dictionary, named_destinations: &mut IndexMap<Vec<u8>, Destination>,
    ) -> Result<()> {
        if let Ok(kids) = tree.get(b"Kids") {
            for kid in kids.as_array()? {
                if let Ok(kid_dict) = kid.as_reference().and_then(|id| self.get_dictionary(id)) {
                    self.get_named_destinations(kid_dict, named_destinations)?;
                }
            }
        }

        if let Ok(names) = tree.get(b"Names") {
            let mut names = names.as_array()?.iter();
            while let (Some(key), Some(value)) = (names.next(), names.next()) {
                let Ok(key_bytes) = key.as_str() else { continue };

                if let Ok(obj_ref) = value.as_reference() {
                    if let Ok(dict) = self.get_dictionary(obj_ref) {
                        self.insert_if_destination_array(&key_bytes, dict, key, named_destinations);
                    } else if let Ok(Object::Array(array)) = self.get_object(obj_ref) {
                        if array.len() >= 2 {
                            let dest = Destination::new(key.clone(), array[0].clone(), array[1].clone());
                            named_destinations.insert(key_bytes, dest);
                        }
                    }
                } else if let Ok(dict) = value.as_dict() {
                    self.insert_if_destination_array(&key_bytes, dict, key, named_destinations);
                }
                // Silently skip unexpected node types.
            }
        }
        Ok(())
    }

    fn insert_if_destination_array(
        &self, key_bytes: &[u8], dict: &Dictionary, key: &Object,
        named_destinations: &mut IndexMap<Vec<u8>, Destination>,
    ) {
        if let Ok(array) = dict.get(b"D").and_then(Object::as_array) {
            if array.len() >= 2 {
                let dest = Destination::new(key.clone(), array[0].clone(), array[1].clone());
                named_destinations.insert(key_bytes.to_vec(), dest);
            }
        }
    }
}
