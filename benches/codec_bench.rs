use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{ImageFormat, RgbImage};
use s3_image_optim::codec::{self, CodecOptions};
use s3_image_optim::sniff;
use s3_image_optim::ImageKind;
use std::io::Cursor;

fn create_test_image(size: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(size, size, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

fn bench_codec_options_creation(c: &mut Criterion) {
    c.bench_function("codec_options_creation", |b| {
        b.iter(|| CodecOptions::new(black_box(Some(85)), black_box(Some(75)), black_box(Some(4))))
    });
}

fn bench_detect(c: &mut Criterion) {
    let png = create_test_image(64, ImageFormat::Png);
    let svg = b"<?xml version=\"1.0\"?><svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".to_vec();

    c.bench_function("detect_png", |b| b.iter(|| sniff::detect(black_box(&png))));
    c.bench_function("detect_svg", |b| b.iter(|| sniff::detect(black_box(&svg))));
}

fn bench_png_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_optimize");
    group.sample_size(10);
    let data = create_test_image(128, ImageFormat::Png);

    for level in [0u8, 2, 4, 7] {
        let options = CodecOptions::new(None, None, Some(level)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, _| {
            b.iter(|| codec::optimize(ImageKind::Png, black_box(&data), &options))
        });
    }
    group.finish();
}

fn bench_jpeg_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpeg_optimize");
    group.sample_size(10);
    let options = CodecOptions::default();

    for size in [64u32, 256, 512] {
        let data = create_test_image(size, ImageFormat::Jpeg);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| codec::optimize(ImageKind::Jpeg, black_box(&data), &options))
        });
    }
    group.finish();
}

fn bench_webp(c: &mut Criterion) {
    let data = create_test_image(256, ImageFormat::WebP);
    let options = CodecOptions::default();

    c.bench_function("webp_optimize_256", |b| {
        b.iter(|| codec::optimize(ImageKind::WebP, black_box(&data), &options))
    });
}

criterion_group!(
    benches,
    bench_codec_options_creation,
    bench_detect,
    bench_png_levels,
    bench_jpeg_sizes,
    bench_webp
);
criterion_main!(benches);
