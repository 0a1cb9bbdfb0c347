//! Benchmarks the writer (spec §4.7): importing pages from a source
//! document (reference sweep + stream hoisting) and serialising the
//! resulting object table.

use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use pdfsplice::{Document, Writer};

/// Builds a classic-xref PDF with `num_pages` pages, each with its own
/// one-line content stream, so benchmarks don't depend on a binary fixture
/// on disk. Mirrors `benches/load.rs`'s generator.
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

fn bench_write_50_pages(c: &mut Criterion) {
    let source = Document::load_from(Cursor::new(build_pdf(50))).unwrap();

    let mut writer = Writer::new();
    for i in 0..source.page_count().unwrap() as usize {
        writer.add_page(&source.page(i).unwrap()).unwrap();
    }

    c.bench_function("write_50_pages", |b| {
        b.iter(|| {
            let mut output = Vec::new();
            writer.write(&mut output).unwrap();
        })
    });
}

fn bench_add_page_imports_subtree(c: &mut Criterion) {
    let source = Document::load_from(Cursor::new(build_pdf(1))).unwrap();
    let page = source.page(0).unwrap();

    c.bench_function("add_page_imports_subtree", |b| {
        b.iter(|| {
            let mut writer = Writer::new();
            writer.add_page(&page).unwrap();
        })
    });
}

criterion_group!(benches, bench_write_50_pages, bench_add_page_imports_subtree);
criterion_main!(benches);
