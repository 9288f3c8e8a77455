//! Envelope codec benchmark suite.
//!
//! Benchmarks encode/decode throughput of the JSON envelope at different
//! payload sizes.
//!
//! Run with: cargo bench --bench envelope
//! Results saved to: target/criterion/

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

use sockline::Envelope;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const FIELD_COUNTS: &[usize] = &[1, 16, 256];

fn payload(fields: usize) -> Value {
    let mut map = serde_json::Map::with_capacity(fields);
    for i in 0..fields {
        map.insert(format!("field-{i}"), json!(i as u64));
    }
    Value::Object(map)
}

// ============================================================================
// Benchmark: Encode
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope_encode");

    for &fields in FIELD_COUNTS {
        let envelope = Envelope::new("bench-event", payload(fields));
        group.bench_with_input(BenchmarkId::new("fields", fields), &envelope, |b, e| {
            b.iter(|| e.encode().expect("encode"));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Decode
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope_decode");

    for &fields in FIELD_COUNTS {
        let text = Envelope::new("bench-event", payload(fields))
            .encode()
            .expect("encode");
        group.bench_with_input(BenchmarkId::new("fields", fields), &text, |b, t| {
            b.iter(|| Envelope::decode(t).expect("decode"));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Text Fast Path
// ============================================================================

fn bench_text_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope_text");

    group.bench_function("encode", |b| {
        b.iter(|| Envelope::text("hello, world").encode().expect("encode"));
    });

    let wire = Envelope::text("hello, world").encode().expect("encode");
    group.bench_function("decode", |b| {
        b.iter(|| Envelope::decode(&wire).expect("decode"));
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_text_envelope);
criterion_main!(benches);
