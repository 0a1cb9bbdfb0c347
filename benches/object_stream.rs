//! Benchmarks decoding a compressed object stream (`/ObjStm`, spec §4.3).

use criterion::{criterion_group, criterion_main, Criterion};
use pdfsplice::{Dictionary, Object, Stream};
use pdfsplice::object_stream::ObjectStream;

/// Builds an uncompressed `/ObjStm` payload holding `count` small
/// dictionary objects, keyed 1..=count.
fn build_object_stream(count: u32) -> Stream {
    let mut header = String::new();
    let mut body = String::new();
    for i in 1..=count {
        let offset = body.len();
        header.push_str(&format!("{i} {offset} "));
        body.push_str(&format!("<</Type/TestObj/Value {i}>>"));
    }

    let mut payload = header.clone().into_bytes();
    payload.extend_from_slice(body.as_bytes());

    let mut dict = Dictionary::new();
    dict.set("Type", "ObjStm");
    dict.set("N", Object::Integer(count as i64));
    dict.set("First", Object::Integer(header.len() as i64));

    Stream::new(dict, payload)
}

fn bench_object_stream_decode(c: &mut Criterion) {
    let stream = build_object_stream(100);

    c.bench_function("object_stream_decode_100", |b| {
        b.iter(|| {
            ObjectStream::new(&stream).unwrap();
        })
    });
}

criterion_group!(benches, bench_object_stream_decode);
criterion_main!(benches);
