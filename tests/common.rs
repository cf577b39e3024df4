#![allow(dead_code)]

use image::{ImageFormat, RgbImage, RgbaImage};
use s3_image_optim::{CodecPool, MemoryStore, OptimConfig, Optimizer};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const BUCKET: &str = "uploads";

fn encode(img: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

/// A PNG written without any optimization, so oxipng always finds savings
pub fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_fn(96, 96, |x, y| {
        image::Rgba([(x * 2) as u8, (y * 2) as u8, ((x + y) % 256) as u8, 255])
    });
    encode(image::DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn jpeg_bytes() -> Vec<u8> {
    let img = RgbImage::from_fn(96, 96, |x, y| image::Rgb([(x * 2) as u8, (y * 2) as u8, 90]));
    encode(image::DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

pub fn svg_bytes() -> Vec<u8> {
    b"<?xml version=\"1.0\"?>\n<!-- exported -->\n<svg xmlns=\"http://www.w3.org/2000/svg\">\n    <rect width=\"10\" height=\"10\"/>\n</svg>\n".to_vec()
}

pub fn no_metadata() -> HashMap<String, String> {
    HashMap::new()
}

pub fn optimizer(store: Arc<MemoryStore>, config: OptimConfig) -> Arc<Optimizer> {
    let codecs = CodecPool::new(Some(2)).unwrap();
    Arc::new(Optimizer::new(store, config, codecs))
}

/// An S3 notification naming `keys` (already URL-encoded) in `bucket`
pub fn event_json(bucket: &str, keys: &[&str]) -> String {
    let records: Vec<_> = keys
        .iter()
        .map(|key| {
            serde_json::json!({
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": bucket },
                    "object": { "key": key, "size": 1 }
                }
            })
        })
        .collect();
    serde_json::json!({ "Records": records }).to_string()
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
