//! Literal codec benchmarks for sqlfetch
//!
//! Every blob read goes through `X'..'` parsing and every generated
//! statement through literal rendering, so both sides are measured here
//! across payload sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sqlfetch::parsing::{parse_blob_literal, render_blob_literal};
use sqlfetch::{KeyFlags, TypeTag, TypedValue};

const SIZES: [(usize, &str); 4] = [(8, "8B"), (256, "256B"), (4096, "4KB"), (65536, "64KB")];

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

fn bench_blob_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob_render");

    for (len, name) in SIZES {
        let bytes = payload(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("render", name), &bytes, |b, bytes| {
            b.iter(|| render_blob_literal(black_box(bytes)))
        });
    }

    group.finish();
}

fn bench_blob_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob_parse");

    for (len, name) in SIZES {
        let literal = render_blob_literal(&payload(len)).to_uppercase();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), &literal, |b, literal| {
            b.iter(|| parse_blob_literal(black_box(literal)).unwrap())
        });
    }

    group.finish();
}

fn bench_scalar_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_literal");

    let values = [
        ("int64", TypedValue::of(-1_234_567_890i64)),
        ("double", TypedValue::of(3.141592653589793f64)),
        ("bool", TypedValue::of(true)),
        ("text", TypedValue::of("a moderately long label for a row")),
    ];
    for (name, value) in &values {
        group.bench_with_input(BenchmarkId::new("render", name), value, |b, value| {
            b.iter(|| black_box(value).render_literal())
        });
    }

    let cases = [
        ("int16", TypeTag::Int16, "-12345"),
        ("uint64", TypeTag::UInt64, "18446744073709551615"),
        ("double", TypeTag::Double, "2.718281828"),
        ("text", TypeTag::Text, "plain text default"),
    ];
    for (name, tag, text) in cases {
        group.bench_with_input(BenchmarkId::new("parse", name), &text, |b, text| {
            b.iter(|| TypedValue::from_default_text(tag, KeyFlags::NORMAL, black_box(text)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_blob_render,
    bench_blob_parse,
    bench_scalar_literals
);
criterion_main!(benches);
