use std::cell::RefCell;
use std::fmt;

use crate::{Dictionary, Error, Result};

/// `(object number, generation number)`, the key a classic xref table or
/// xref stream maps to a byte offset.
pub type ObjectId = (u32, u16);

/// Provenance tag carried by a [`Object::TextString`] so that its original
/// bytes can be reproduced bit-exactly on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringProvenance {
    PdfDocEncoding,
    Utf16Be,
}

/// A decimal number that preserves the exact lexeme it was parsed from.
///
/// PDF reals are never represented as binary floats here: two real numbers
/// are equal iff their textual lexemes are equal, so that
/// `parse(serialize(x)) == x` holds even for lexemes like `"1.50"` or `".0"`
/// that a binary round-trip would normalise away.
#[derive(Debug, Clone)]
pub struct RealNumber {
    lexeme: String,
    value: f64,
}

impl RealNumber {
    pub fn from_lexeme(lexeme: impl Into<String>) -> Self {
        let lexeme = lexeme.into();
        let value = lexeme.parse().unwrap_or(0.0);
        RealNumber { lexeme, value }
    }

    pub fn from_f64(value: f64) -> Self {
        let mut lexeme = format!("{value}");
        if !lexeme.contains('.') {
            lexeme.push_str(".0");
        }
        RealNumber { lexeme, value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }
}

impl PartialEq for RealNumber {
    fn eq(&self, other: &Self) -> bool {
        self.lexeme == other.lexeme
    }
}

impl fmt::Display for RealNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

/// A stream object: a [`Dictionary`] plus its raw (still filtered) payload.
///
/// Streams are always indirect per ISO 32000; decoded bytes are memoised
/// the first time [`Stream::decompressed_content`] is called.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    pub dict: Dictionary,
    pub content: Vec<u8>,
    /// Absolute byte offset of the payload in the source buffer, for
    /// deferred reads of streams whose `/Length` is an indirect reference
    /// not yet resolved at parse time.
    pub start_position: Option<usize>,
    decoded: RefCell<Option<Vec<u8>>>,
}

impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        self.dict == other.dict && self.content == other.content
    }
}

impl Stream {
    pub fn new(dict: Dictionary, content: Vec<u8>) -> Self {
        Stream {
            dict,
            content,
            start_position: None,
            decoded: RefCell::new(None),
        }
    }

    pub fn with_start_position(mut self, position: usize) -> Self {
        self.start_position = Some(position);
        self
    }

    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
        *self.decoded.borrow_mut() = None;
    }

    /// Decoded payload, running the filter pipeline on first access and
    /// memoising the result.
    pub fn decompressed_content(&self) -> Result<Vec<u8>> {
        if let Some(cached) = self.decoded.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let data = crate::filters::decode_stream(&self.dict, &self.content)?;
        *self.decoded.borrow_mut() = Some(data.clone());
        Ok(data)
    }
}

/// The closed PDF object sum type.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(RealNumber),
    Name(Vec<u8>),
    ByteString(Vec<u8>),
    TextString(String, StringProvenance),
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Stream(Stream),
    Reference(ObjectId),
}

impl Default for Object {
    fn default() -> Self {
        Object::Null
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::Boolean(value)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Object::Real(RealNumber::from_f64(value))
    }
}

impl From<ObjectId> for Object {
    fn from(value: ObjectId) -> Self {
        Object::Reference(value)
    }
}

impl From<Vec<Object>> for Object {
    fn from(value: Vec<Object>) -> Self {
        Object::Array(value)
    }
}

impl From<Dictionary> for Object {
    fn from(value: Dictionary) -> Self {
        Object::Dictionary(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::Name(value.as_bytes().to_vec())
    }
}

impl Object {
    pub fn name(name: impl Into<Vec<u8>>) -> Self {
        Object::Name(name.into())
    }

    pub fn string_literal(text: impl Into<String>) -> Self {
        Object::TextString(text.into(), StringProvenance::PdfDocEncoding)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Object::Boolean(b) => Ok(*b),
            _ => Err(Error::ObjectType("Boolean")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Object::Integer(i) => Ok(*i),
            Object::Real(r) => Ok(r.value() as i64),
            _ => Err(Error::ObjectType("Integer")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Object::Integer(i) => Ok(*i as f64),
            Object::Real(r) => Ok(r.value()),
            _ => Err(Error::ObjectType("Number")),
        }
    }

    pub fn as_name(&self) -> Result<&[u8]> {
        match self {
            Object::Name(name) => Ok(name),
            _ => Err(Error::ObjectType("Name")),
        }
    }

    /// Bytes behind a Name, TextString or ByteString — used to walk `/Names`
    /// trees, whose keys are PDF text strings rather than Names.
    pub fn as_str(&self) -> Result<Vec<u8>> {
        match self {
            Object::Name(bytes) => Ok(bytes.clone()),
            Object::ByteString(bytes) => Ok(bytes.clone()),
            Object::TextString(text, _) => Ok(text.clone().into_bytes()),
            _ => Err(Error::ObjectType("string-like")),
        }
    }

    pub fn as_array(&self) -> Result<&Vec<Object>> {
        match self {
            Object::Array(array) => Ok(array),
            _ => Err(Error::ObjectType("Array")),
        }
    }

    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Object>> {
        match self {
            Object::Array(array) => Ok(array),
            _ => Err(Error::ObjectType("Array")),
        }
    }

    pub fn as_dict(&self) -> Result<&Dictionary> {
        match self {
            Object::Dictionary(dict) => Ok(dict),
            Object::Stream(stream) => Ok(&stream.dict),
            _ => Err(Error::ObjectType("Dictionary")),
        }
    }

    pub fn as_dict_mut(&mut self) -> Result<&mut Dictionary> {
        match self {
            Object::Dictionary(dict) => Ok(dict),
            Object::Stream(stream) => Ok(&mut stream.dict),
            _ => Err(Error::ObjectType("Dictionary")),
        }
    }

    pub fn as_stream(&self) -> Result<&Stream> {
        match self {
            Object::Stream(stream) => Ok(stream),
            _ => Err(Error::ObjectType("Stream")),
        }
    }

    pub fn as_stream_mut(&mut self) -> Result<&mut Stream> {
        match self {
            Object::Stream(stream) => Ok(stream),
            _ => Err(Error::ObjectType("Stream")),
        }
    }

    pub fn as_reference(&self) -> Result<ObjectId> {
        match self {
            Object::Reference(id) => Ok(*id),
            _ => Err(Error::ObjectType("Reference")),
        }
    }

    /// A Rectangle is an Array of exactly four numbers.
    pub fn as_rectangle(&self) -> Result<[f64; 4]> {
        let array = self.as_array()?;
        if array.len() != 4 {
            return Err(Error::ObjectType("Rectangle"));
        }
        let mut out = [0.0; 4];
        for (slot, value) in out.iter_mut().zip(array.iter()) {
            *slot = value.as_f64()?;
        }
        Ok(out)
    }
}
