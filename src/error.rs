use thiserror::Error as ThisError;

use crate::ObjectId;

/// Failures raised while locating or parsing a cross-reference section.
#[derive(Debug, ThisError)]
pub enum XrefError {
    #[error("could not locate startxref / %%EOF")]
    Start,
    #[error("/Prev offset is out of range")]
    PrevStart,
    #[error("/XRefStm offset is out of range")]
    StreamStart,
    #[error("xref table entry is malformed")]
    Parse,
    #[error("xref stream is missing its /W array")]
    MissingW,
    #[error("xref stream /W array has the wrong shape")]
    MalformedW,
    #[error("xref stream has an unsupported or missing /Type")]
    UnsupportedType,
    #[error("trailer dictionary could not be parsed")]
    TrailerParse,
}

/// Failures raised while materialising a single PDF object.
#[derive(Debug, ThisError)]
pub enum ParseError {
    #[error("file header %PDF-x.y is missing or malformed")]
    InvalidFileHeader,
    #[error("xref chain is malformed")]
    InvalidXref,
    #[error("lookahead byte does not start a recognised object")]
    InvalidObject,
    #[error("dictionary has a duplicate key")]
    DuplicateDictionaryKey,
    #[error("dictionary key is not a Name")]
    NonNameKey,
    #[error("stream is missing its /Length entry")]
    MissingStreamLength,
    #[error("endstream marker was not found")]
    MissingEndstream,
    #[error("indirect object header (\"id gen obj\") is malformed")]
    InvalidObjectHeader,
}

/// The crate-wide tagged error type.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xref(#[from] XrefError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unsupported filter {0:?}")]
    UnsupportedFilter(Vec<u8>),

    #[error("unsupported PNG predictor row tag {0}")]
    UnsupportedPredictorTag(u8),

    #[error("unsupported /Predictor value {0}")]
    UnsupportedPredictor(i64),

    #[error("document trailer carries /Encrypt; encrypted documents are rejected")]
    EncryptedDocument,

    #[error("character has no PDFDocEncoding representation")]
    EncodingError,

    #[error("reference cycle detected resolving object {0:?}")]
    ReferenceCycle(ObjectId),

    #[error("no xref entry for object {0:?}")]
    MissingXrefEntry,

    #[error("offset {0} is outside the document buffer")]
    InvalidOffset(usize),

    #[error("invalid stream: {0}")]
    InvalidStream(String),

    #[error("numeric value does not fit: {0}")]
    NumericCast(String),

    #[error("dictionary has no entry for key {0:?}")]
    DictKeyNotFound(Vec<u8>),

    #[error("object is not a {0}")]
    ObjectType(&'static str),

    #[error("page is not of type /Page")]
    NotAPage,
}

pub type Result<T> = std::result::Result<T, Error>;
