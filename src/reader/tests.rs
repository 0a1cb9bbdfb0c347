use super::*;
use crate::Document;

/// A minimal one-page PDF with a classic xref table, built by hand so the
/// reader's tests don't depend on a binary fixture on disk. Object bodies
/// are appended one at a time so each one's byte offset is recorded
/// directly, rather than reconstructed by re-parsing the text afterwards.
fn one_page_pdf() -> Vec<u8> {
    let objects: [(u32, &str); 6] = [
        (1, "1 0 obj<</Type/Pages/Kids[5 0 R]/Count 1/Resources 3 0 R/MediaBox[0 0 595 842]>>endobj\n"),
        (2, "2 0 obj<</Type/Font/Subtype/Type1/BaseFont/Courier>>endobj\n"),
        (3, "3 0 obj<</Font<</F1 2 0 R>>>>endobj\n"),
        (5, "5 0 obj<</Type/Page/Parent 1 0 R/Contents 4 0 R>>endobj\n"),
        (6, "6 0 obj<</Type/Catalog/Pages 1 0 R>>endobj\n"),
        (4, "4 0 obj<</Length 9>>stream\nBT ET Tj\nendstream endobj\n"),
    ];

    let mut out = b"%PDF-1.5\n".to_vec();
    let mut offsets = [0usize; 7];
    for (id, text) in objects {
        offsets[id as usize] = out.len();
        out.extend_from_slice(text.as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(b"xref\n0 7\n");
    out.extend_from_slice(b"0000000000 65535 f \n");
    for id in 1..7 {
        out.extend_from_slice(format!("{:010} 00000 n \n", offsets[id]).as_bytes());
    }
    out.extend_from_slice(b"trailer\n<</Root 6 0 R/Size 7>>\nstartxref\n");
    out.extend_from_slice(xref_offset.to_string().as_bytes());
    out.extend_from_slice(b"\n%%EOF");
    out
}

#[test]
fn load_document() {
    let doc = Document::load_mem(&one_page_pdf()).unwrap();
    assert_eq!(doc.version, "1.5");
    assert_eq!(doc.page_count().unwrap(), 1);
}

#[test]
fn load_short_document_fails() {
    let err = Document::load_mem(b"%PDF-1.5\n%%EOF\n").unwrap_err();
    assert!(matches!(err, Error::Xref(_)));
}

#[test]
fn load_document_with_preceding_bytes() {
    let mut content = b"garbage".to_vec();
    content.extend(one_page_pdf());
    let doc = Document::load_mem(&content).unwrap();
    assert_eq!(doc.version, "1.5");
}

#[test]
fn load_many_shallow_brackets() {
    let content: String = std::iter::repeat("()").take(MAX_BRACKET * 10).flat_map(|x| x.chars()).collect();
    let text = format!("({content})");
    let result = crate::parser::parse_object(text.as_bytes());
    assert!(result.is_ok());
}

#[test]
fn load_too_deep_brackets_errs() {
    let content: Vec<u8> =
        std::iter::repeat(b'(').take(MAX_BRACKET + 1).chain(std::iter::repeat(b')').take(MAX_BRACKET + 1)).collect();
    let result = crate::parser::parse_object(&content);
    assert!(result.is_err());
}

#[test]
fn search_substring_finds_last_occurrence() {
    assert_eq!(Reader::search_substring(b"hello world", b"xyz", 0), None);
    assert_eq!(Reader::search_substring(b"hello world", b"world", 0), Some(6));

    let buffer = b"%%EOF\ntest%%EOF\nend";
    assert_eq!(Reader::search_substring(buffer, b"%%EOF", 0), Some(10));
    assert_eq!(Reader::search_substring(buffer, b"%%EOF", 6), Some(10));
    assert_eq!(Reader::search_substring(buffer, b"%%EOF", 15), None);
    assert_eq!(Reader::search_substring(b"%%EOF", b"%%EOF", 0), Some(0));

    let buffer_with_many_percents = b"%%%PDF-1.3%%%comment%%%more%%EOF";
    assert_eq!(Reader::search_substring(buffer_with_many_percents, b"%%EOF", 0), Some(27));
}
