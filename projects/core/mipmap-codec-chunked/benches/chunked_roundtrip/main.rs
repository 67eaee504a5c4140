use core::time::Duration;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mipmap_codec_chunked::{compress_chunked, decompress_chunked_slice, ChunkedSettingsBuilder};
use mipmap_codec_zstd::ZStandardCompressor;
use std::hint::black_box;

// Helper to generate data that compresses roughly like DXT5 blocks
fn generate_test_data(len: usize) -> Vec<u8> {
    let mut seed = 0x9E37_79B9u32;
    (0..len)
        .map(|x| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            match x % 16 {
                0..=1 => 0xFF,
                2..=7 => (seed >> 30) as u8,
                _ => ((x >> 8) as u8).wrapping_add((seed >> 29) as u8),
            }
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chunked ZStandard");
    let size = 8 * 1024 * 1024;
    let data = generate_test_data(size);
    let compressor = ZStandardCompressor::new_fast();

    group.throughput(Throughput::Bytes(size as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(10));

    for parallel in [true, false] {
        let settings = ChunkedSettingsBuilder::new().parallel(parallel).build();
        let name = if parallel { "parallel" } else { "sequential" };

        group.bench_with_input(BenchmarkId::new("compress", name), &data, |b, data| {
            b.iter(|| compress_chunked(black_box(&compressor), black_box(data), &settings))
        });

        let container = compress_chunked(&compressor, &data, &settings).unwrap();
        group.bench_with_input(
            BenchmarkId::new("decompress", name),
            &container,
            |b, container| {
                b.iter(|| {
                    decompress_chunked_slice(black_box(&compressor), black_box(container), &settings)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
