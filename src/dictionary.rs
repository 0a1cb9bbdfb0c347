use indexmap::IndexMap;

use crate::{Error, Object};

/// A PDF dictionary: an ordered mapping from `Name` bytes to [`Object`].
///
/// Keys are compared by byte equality, never decoded to a language-native
/// string type. Insertion order is preserved with
/// [`IndexMap`] so that re-serialising a dictionary that was never mutated
/// reproduces the same key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary(IndexMap<Vec<u8>, Object>);

impl Dictionary {
    pub fn new() -> Self {
        Dictionary(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &[u8]) -> crate::Result<&Object> {
        self.0.get(key).ok_or_else(|| Error::DictKeyNotFound(key.to_vec()))
    }

    pub fn get_mut(&mut self, key: &[u8]) -> crate::Result<&mut Object> {
        self.0.get_mut(key).ok_or_else(|| Error::DictKeyNotFound(key.to_vec()))
    }

    pub fn has(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Vec<u8>>,
        V: Into<Object>,
    {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Object> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Object)> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Vec<u8>, &mut Object)> {
        self.0.iter_mut()
    }

    /// Insert `key`, failing if it is already present. Duplicate keys
    /// during parsing are rejected rather than silently overwritten.
    pub fn insert_unique(&mut self, key: Vec<u8>, value: Object) -> crate::Result<()> {
        if self.0.contains_key(&key) {
            return Err(Error::Parse(crate::error::ParseError::DuplicateDictionaryKey));
        }
        self.0.insert(key, value);
        Ok(())
    }

    /// Merge `other`'s keys into `self`, keeping `self`'s value whenever a
    /// key is present in both: trailer keys merge "first occurrence wins"
    /// across a `/Prev` chain.
    pub fn merge_missing(&mut self, other: &Dictionary) {
        for (key, value) in other.iter() {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn get_type(&self) -> crate::Result<&[u8]> {
        self.get(b"Type").and_then(Object::as_name)
    }

    pub fn has_type(&self, type_name: &[u8]) -> bool {
        self.get_type().map(|t| t == type_name).unwrap_or(false)
    }
}

/// Build a [`Dictionary`] literal inline.
#[macro_export]
macro_rules! dictionary {
    () => { $crate::Dictionary::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut dict = $crate::Dictionary::new();
        $(dict.set($key, $value);)+
        dict
    }};
}
