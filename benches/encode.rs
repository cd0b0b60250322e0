//! pgencode benchmarks
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgencode::{CopyEncoder, JsonStringify, Value, encode_batch};

fn row(i: i64) -> Value<i64> {
    Value::seq([
        Value::Other(i),
        Value::text(format!("user{}@example.com", i)),
        Value::text("line one\nline two\ttabbed"),
        Value::Null,
        Value::bytes(vec![0u8, 1, 2, 0xff]),
    ])
}

/// Benchmark: single record, reused buffer
fn bench_encode_record(c: &mut Criterion) {
    let value = row(42);
    let mut encoder = CopyEncoder::new();

    c.bench_function("encode_record", |b| {
        b.iter(|| encoder.encode(black_box(&value)).unwrap());
    });
}

/// Benchmark: batches of rows into one buffer
fn bench_encode_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_batch");

    for size in [100usize, 10_000] {
        let rows: Vec<_> = (0..size as i64).map(row).collect();
        let mut encoder = CopyEncoder::new();
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| encode_batch(&mut encoder, black_box(rows)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark: JSON line to COPY record
fn bench_json_record(c: &mut Criterion) {
    let line = r#"[1, "hello\tworld", null, 3.25, {"k": [1, 2]}]"#;
    let mut encoder = CopyEncoder::with_stringify(JsonStringify);

    c.bench_function("json_record", |b| {
        b.iter(|| {
            let value = pgencode::json::parse_record(black_box(line)).unwrap();
            encoder.encode(&value).unwrap()
        });
    });
}

criterion_group!(benches, bench_encode_record, bench_encode_batch, bench_json_record);
criterion_main!(benches);
