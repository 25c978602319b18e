//! Segment codec benchmarks.

use chunkstore_bench::utils::random_data;
use chunkstore_codec::{join_segments, SegmentCodec};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SEGMENT_SIZE: usize = 4096;

/// Benchmark splitting payloads of varying size.
fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    let codec = SegmentCodec::new(SEGMENT_SIZE).unwrap();

    for size in [1024, 16 * 1024, 256 * 1024, 1024 * 1024].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data = random_data(size);
            b.iter(|| {
                let mut wire = Vec::with_capacity(size + size / 8);
                let count = codec.split_bytes(black_box(&data), &mut wire).unwrap();
                black_box((count, wire));
            });
        });
    }

    group.finish();
}

/// Benchmark joining a segment file.
fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");
    let codec = SegmentCodec::new(SEGMENT_SIZE).unwrap();

    for size in [1024, 16 * 1024, 256 * 1024, 1024 * 1024].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut wire = Vec::new();
            codec.split_bytes(&random_data(size), &mut wire).unwrap();
            b.iter(|| {
                let joined = codec.join_bytes(black_box(wire.as_slice())).unwrap();
                black_box(joined);
            });
        });
    }

    group.finish();
}

/// Benchmark reconstruction from reversed segments.
fn bench_join_reversed(c: &mut Criterion) {
    let codec = SegmentCodec::new(SEGMENT_SIZE).unwrap();
    let mut segments = codec.partition(&random_data(1024 * 1024)).unwrap();
    segments.reverse();

    c.bench_function("join_reversed_1m", |b| {
        b.iter(|| {
            let joined = join_segments(black_box(segments.clone()).into_iter().map(Ok)).unwrap();
            black_box(joined);
        });
    });
}

criterion_group!(benches, bench_split, bench_join, bench_join_reversed);

criterion_main!(benches);
