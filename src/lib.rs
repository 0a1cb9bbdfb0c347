//! A minimal library for splitting and merging PDF documents at page
//! granularity: a PDF object model, a lexical/structural parser, a
//! cross-reference resolution engine spanning both classic xref tables and
//! PDF-1.5 xref streams, a filter/predictor decoding pipeline, and a writer
//! that serialises an in-memory object graph back to a valid PDF-1.3 file.
//!
//! The entry points are [`Reader::read`] (or the [`Document`] loading
//! helpers in [`mod@reader`]) to open a document, [`Document::page`] to pull
//! a flattened page out of it, and [`Writer`] to assemble a new file from
//! pages pulled out of one or more source documents.

pub mod destinations;
pub mod dictionary;
pub mod document;
pub mod encodings;
pub mod error;
pub mod filters;
pub mod object;
pub mod object_stream;
pub mod page;
pub mod parser;
pub mod reader;
pub mod writer;
pub mod xref;

pub use destinations::Destination;
pub use dictionary::Dictionary;
pub use document::Document;
pub use error::{Error, Result};
pub use object::{Object, ObjectId, RealNumber, Stream, StringProvenance};
pub use page::Page;
pub use reader::{PdfMetadata, Reader};
pub use writer::Writer;
pub use xref::{Xref, XrefEntry};
