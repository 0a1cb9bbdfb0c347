//! Benchmarks the low-level object parser (spec §4.2) directly, independent
//! of xref resolution.

use criterion::{criterion_group, criterion_main, Criterion};
use pdfsplice::parser::parse_object;

fn bench_parse_dictionary(c: &mut Criterion) {
    let input = b"<< /Type /Page /Parent 1 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 2 0 R >> >> /Contents 3 0 R >>";

    c.bench_function("parse_dictionary", |b| {
        b.iter(|| {
            parse_object(input).unwrap();
        })
    });
}

fn bench_parse_array_of_numbers(c: &mut Criterion) {
    let input = b"[0 0 612.5 792.25 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20]";

    c.bench_function("parse_array_of_numbers", |b| {
        b.iter(|| {
            parse_object(input).unwrap();
        })
    });
}

fn bench_parse_literal_string(c: &mut Criterion) {
    let input = b"(The quick brown fox jumps over the lazy dog, again and again.)";

    c.bench_function("parse_literal_string", |b| {
        b.iter(|| {
            parse_object(input).unwrap();
        })
    });
}

criterion_group!(benches, bench_parse_dictionary, bench_parse_array_of_numbers, bench_parse_literal_string);
criterion_main!(benches);
