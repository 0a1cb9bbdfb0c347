//! Benchmarks the whole-document load path (spec §5 `Reader::read`):
//! xref resolution, object materialisation, and — for the second
//! benchmark — the early `/Encrypt` rejection (spec §7).

use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use pdfsplice::Document;

/// Builds a classic-xref PDF with `num_pages` pages, each with its own
/// one-line content stream, so benchmarks don't depend on a binary fixture
/// on disk.
fn build_pdf(num_pages: u32) -> Vec<u8> {
    let kids: String = (0..num_pages).map(|i| format!("{} 0 R ", 4 + 2 * i)).collect();
    let pages_obj = format!("1 0 obj<</Type/Pages/Kids[{}]/Count {}>>endobj\n", kids.trim_end(), num_pages);
    let catalog_obj = "2 0 obj<</Type/Catalog/Pages 1 0 R>>endobj\n".to_string();

    let mut out = b"%PDF-1.5\n".to_vec();
    let mut offsets = Vec::new();

    offsets.push((1u32, out.len()));
    out.extend_from_slice(pages_obj.as_bytes());
    offsets.push((2u32, out.len()));
    out.extend_from_slice(catalog_obj.as_bytes());

    for i in 0..num_pages {
        let content_id = 3 + 2 * i;
        let page_id = 4 + 2 * i;
        let content = b"BT /F1 12 Tf (Hello, world) Tj ET";

        offsets.push((content_id, out.len()));
        out.extend_from_slice(format!("{content_id} 0 obj<</Length {}>>stream\n", content.len()).as_bytes());
        out.extend_from_slice(content);
        out.extend_from_slice(b"\nendstream endobj\n");

        offsets.push((page_id, out.len()));
        out.extend_from_slice(
            format!("{page_id} 0 obj<</Type/Page/Parent 1 0 R/Contents {content_id} 0 R/MediaBox[0 0 612 792]>>endobj\n")
                .as_bytes(),
        );
    }

    let size = 2 * num_pages + 3;
    let xref_offset = out.len();
    offsets.sort_by_key(|&(id, _)| id);

    out.extend_from_slice(format!("xref\n0 {size}\n").as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for (_, offset) in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(format!("trailer\n<</Root 2 0 R/Size {size}>>\nstartxref\n{xref_offset}\n%%EOF").as_bytes());
    out
}

fn bench_load(c: &mut Criterion) {
    let buffer = build_pdf(50);

    c.bench_function("load_50_pages", |b| {
        b.iter(|| {
            Document::load_from(Cursor::new(&buffer)).unwrap();
        })
    });
}

fn bench_load_rejects_encrypted(c: &mut Criterion) {
    let mut buffer = build_pdf(1);
    // Splice an /Encrypt entry into the trailer so the reader rejects it
    // right after resolving the xref chain (spec §7 EncryptedDocument).
    let marker = b"/Size";
    let pos = buffer.windows(marker.len()).rposition(|w| w == marker).unwrap();
    let encrypt = b"/Encrypt 99 0 R ";
    buffer.splice(pos..pos, encrypt.iter().copied());

    c.bench_function("load_rejects_encrypted", |b| {
        b.iter(|| {
            let _ = Document::load_from(Cursor::new(&buffer));
        })
    });
}

criterion_group!(benches, bench_load, bench_load_rejects_encrypted);
criterion_main!(benches);
