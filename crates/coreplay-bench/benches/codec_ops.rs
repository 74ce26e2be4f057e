//! Criterion micro-benchmarks for recording decode and inspection.

use std::hint::black_box;

use coreplay_bench::{recording_bytes, REFERENCE};
use coreplay_format::codec::decode_event;
use coreplay_format::{InspectReport, RecordReader, Recording, EVENT_SIZE, HEADER_SIZE};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

/// Benchmark: Decode and validate one 16-byte record.
fn bench_decode_event(c: &mut Criterion) {
    let bytes = recording_bytes(REFERENCE, 1);
    let mut record = [0u8; EVENT_SIZE];
    record.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + EVENT_SIZE]);

    c.bench_function("decode_event", |b| {
        b.iter(|| {
            let raw = decode_event(black_box(&record));
            black_box(raw.validate(REFERENCE.core_size)).ok();
        });
    });
}

/// Benchmark: Load the reference recording from memory.
fn bench_load_reference(c: &mut Criterion) {
    let bytes = recording_bytes(REFERENCE, 1);
    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Elements(REFERENCE.events as u64));
    group.bench_function("reference_100k", |b| {
        b.iter(|| {
            let rec = Recording::from_bytes(black_box(&bytes)).unwrap();
            black_box(rec.len());
        });
    });
    group.bench_function("stream_reference_100k", |b| {
        b.iter(|| {
            let mut reader = RecordReader::open(bytes.as_slice()).unwrap();
            let n = reader.events().filter(|e| e.is_ok()).count();
            black_box(n);
        });
    });
    group.finish();
}

/// Benchmark: Summarize the reference recording.
fn bench_inspect_reference(c: &mut Criterion) {
    let rec = Recording::from_bytes(&recording_bytes(REFERENCE, 1)).unwrap();

    c.bench_function("inspect_reference_100k", |b| {
        b.iter(|| {
            let report = InspectReport::new(black_box(&rec));
            black_box(report.cycle_range);
        });
    });
}

criterion_group!(
    benches,
    bench_decode_event,
    bench_load_reference,
    bench_inspect_reference
);
criterion_main!(benches);
