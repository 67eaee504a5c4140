use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use mipmap_codec_common::color_8888::Color8888;
use mipmap_codec_common::tile::Tile;
use mipmap_codec_dxtc::{
    compress_image, compress_rgb_tile, compress_tile_gradient_alpha, decompress_image,
    BlockFormat,
};
use std::hint::black_box;

/// Deterministic noisy gradient, so the endpoint search can't take the flat block shortcut.
fn generate_image(width: usize, height: usize) -> Vec<u8> {
    let mut seed = 0x1234_5678u32;
    let mut image = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (seed >> 28) as usize;
            image.extend_from_slice(&[
                ((x + noise) & 0xFF) as u8,
                ((y + noise) & 0xFF) as u8,
                ((x ^ y) & 0xFF) as u8,
                ((x + y) & 0xFF) as u8,
            ]);
        }
    }
    image
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tile Compression");

    let tile = Tile::from_pixels(core::array::from_fn(|x| {
        Color8888::new(x as u8 * 16, 255 - x as u8 * 9, (x as u8) << 3, x as u8 * 17)
    }));
    group.throughput(Throughput::Elements(1));
    group.bench_function("compress_rgb_tile", |b| {
        b.iter(|| compress_rgb_tile(black_box(&tile), None))
    });
    group.bench_function("compress_tile_gradient_alpha", |b| {
        b.iter(|| compress_tile_gradient_alpha(black_box(&tile)))
    });
    group.finish();

    let mut group = c.benchmark_group("Image Compression (256x256)");
    let (width, height) = (256, 256);
    let image = generate_image(width, height);
    group.throughput(Throughput::Bytes(image.len() as u64));

    for format in BlockFormat::all_values() {
        group.bench_function(format!("compress_{format:?}"), |b| {
            b.iter(|| compress_image(black_box(&image), width, height, *format).unwrap())
        });

        let blocks = compress_image(&image, width, height, *format).unwrap();
        group.bench_function(format!("decompress_{format:?}"), |b| {
            b.iter(|| decompress_image(black_box(&blocks), width, height, *format).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
