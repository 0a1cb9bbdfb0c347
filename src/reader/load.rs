//! Convenience constructors for [`Document`]: from a file path, from any
//! [`Read`] source, or from an in-memory buffer, plus their
//! `load_metadata*` counterparts that skip materialising every object.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{PdfMetadata, Reader};
use crate::{Document, Result};

impl Document {
    /// Load a PDF document from a specified file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Document> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        Document::load_mem(&buffer)
    }

    /// Load a PDF document from an arbitrary byte source.
    pub fn load_from<R: Read>(mut source: R) -> Result<Document> {
        let mut buffer = Vec::new();
        source.read_to_end(&mut buffer)?;
        Document::load_mem(&buffer)
    }

    /// Load a PDF document from a memory slice.
    pub fn load_mem(buffer: &[u8]) -> Result<Document> {
        Reader::new(buffer).read()
    }

    /// Load PDF metadata (title, author, page count, ...) without loading
    /// every object in the document — much faster for large files when only
    /// the `/Info` dictionary and page count are needed.
    pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<PdfMetadata> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        Document::load_metadata_mem(&buffer)
    }

    /// Load PDF metadata from an arbitrary byte source.
    pub fn load_metadata_from<R: Read>(mut source: R) -> Result<PdfMetadata> {
        let mut buffer = Vec::new();
        source.read_to_end(&mut buffer)?;
        Document::load_metadata_mem(&buffer)
    }

    /// Load PDF metadata from a memory slice.
    pub fn load_metadata_mem(buffer: &[u8]) -> Result<PdfMetadata> {
        Reader::new(buffer).read_metadata()
    }
}
