use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dlpipe_fetch::{ByteCounter, TrackedChain, TransformChain};
use dlpipe_verify::{HashAlgorithm, SharedHasher};

const TOTAL_BYTES: usize = 16 * 1024 * 1024;

fn taps(algorithms: &[HashAlgorithm]) -> Vec<SharedHasher> {
    algorithms.iter().map(|&algorithm| SharedHasher::new(algorithm)).collect()
}

async fn pump(chunk: &[u8], taps: Vec<SharedHasher>) -> u64 {
    let mut chain = TrackedChain::new(
        TransformChain::new(tokio::io::sink(), taps),
        ByteCounter::default(),
    );
    for _ in 0..TOTAL_BYTES / chunk.len() {
        chain.write(black_box(chunk)).await.unwrap();
    }
    chain.committed()
}

fn bench_chain_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_chunk_sizes");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for chunk_size in [1024, 8 * 1024, 64 * 1024] {
        let chunk = vec![0xa5u8; chunk_size];
        group.throughput(Throughput::Bytes((TOTAL_BYTES - TOTAL_BYTES % chunk_size) as u64));
        group.bench_with_input(BenchmarkId::new("sha256", chunk_size), &chunk, |b, chunk| {
            b.iter(|| rt.block_on(pump(chunk, taps(&[HashAlgorithm::Sha256]))));
        });
    }

    group.finish();
}

fn bench_chain_taps(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_taps");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let chunk = vec![0x5au8; 64 * 1024];
    group.throughput(Throughput::Bytes(TOTAL_BYTES as u64));

    let cases: [(&str, &[HashAlgorithm]); 3] = [
        ("none", &[]),
        ("sha256", &[HashAlgorithm::Sha256]),
        ("sha256+md5", &[HashAlgorithm::Sha256, HashAlgorithm::Md5]),
    ];
    for (name, algorithms) in cases {
        group.bench_function(BenchmarkId::new("fan_out", name), |b| {
            b.iter(|| rt.block_on(pump(&chunk, taps(algorithms))));
        });
    }

    group.finish();
}

criterion_group!(
    name = stream_processing_benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(20);
    targets = bench_chain_chunk_sizes, bench_chain_taps
);

criterion_main!(stream_processing_benches);
