use crate::constants::{
    DEFAULT_JPEG_QUALITY, DEFAULT_PNG_OPTIM_LEVEL, DEFAULT_WEBP_QUALITY, GIF_ENCODE_SPEED,
    LIBDEFLATER_HIGH_LEVEL, MAX_OXIPNG_PRESET, MAX_PNG_OPTIM_LEVEL, MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{OptimError, Result};
use crate::formats::ImageKind;
use crate::svg;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, ImageFormat};
use oxipng::{Deflaters, Options};
use std::io::Cursor;

/// Format-specific codec settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecOptions {
    pub jpeg_quality: u8,
    pub webp_quality: u8,
    /// 0 (fastest) to 7 (strongest)
    pub png_level: u8,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            webp_quality: DEFAULT_WEBP_QUALITY,
            png_level: DEFAULT_PNG_OPTIM_LEVEL,
        }
    }
}

impl CodecOptions {
    pub fn new(
        jpeg_quality: Option<u8>,
        webp_quality: Option<u8>,
        png_level: Option<u8>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let jpeg_quality = validate_quality(jpeg_quality.unwrap_or(defaults.jpeg_quality))?;
        let webp_quality = validate_quality(webp_quality.unwrap_or(defaults.webp_quality))?;

        let png_level = png_level.unwrap_or(defaults.png_level);
        if png_level > MAX_PNG_OPTIM_LEVEL {
            return Err(OptimError::InvalidPngLevel(png_level));
        }

        Ok(Self {
            jpeg_quality,
            webp_quality,
            png_level,
        })
    }

    fn oxipng_options(&self) -> Options {
        let mut options = Options::from_preset(self.png_level.min(MAX_OXIPNG_PRESET));
        if self.png_level > MAX_OXIPNG_PRESET {
            options.deflate = Deflaters::Libdeflater {
                compression: LIBDEFLATER_HIGH_LEVEL,
            };
            options.optimize_alpha = true;
        }
        options
    }
}

fn validate_quality(quality: u8) -> Result<u8> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(OptimError::InvalidQuality(quality));
    }
    Ok(quality)
}

/// Compress `data` with the codec for `kind`.
///
/// When the codec cannot beat the input size the input is returned
/// unchanged, so an optimized object never grows.
pub fn optimize(kind: ImageKind, data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    let compressed = encode(kind, data, options)?;
    if compressed.len() >= data.len() {
        tracing::debug!(
            format = %kind,
            size_before = data.len(),
            size_after = compressed.len(),
            "codec output is not smaller, keeping original bytes"
        );
        return Ok(data.to_vec());
    }
    Ok(compressed)
}

fn encode(kind: ImageKind, data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    match kind {
        ImageKind::Gif => compress_gif(data),
        ImageKind::Jpeg => compress_jpeg(data, options.jpeg_quality),
        ImageKind::Png => compress_png(data, options),
        ImageKind::Svg => svg::minify(data),
        ImageKind::WebP => compress_webp(data, options.webp_quality),
    }
}

/// Re-encode through mozjpeg with progressive scans and optimized Huffman tables
fn compress_jpeg(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
        .map_err(|e| OptimError::codec(ImageKind::Jpeg, e))?;
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| OptimError::codec(ImageKind::Jpeg, e))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| OptimError::codec(ImageKind::Jpeg, e))?;
    comp.finish().map_err(|e| OptimError::codec(ImageKind::Jpeg, e))
}

/// Lossless PNG optimization with oxipng
fn compress_png(data: &[u8], options: &CodecOptions) -> Result<Vec<u8>> {
    oxipng::optimize_from_memory(data, &options.oxipng_options())
        .map_err(|e| OptimError::codec(ImageKind::Png, e))
}

/// Re-quantize every frame, keeping the animation
fn compress_gif(data: &[u8]) -> Result<Vec<u8>> {
    let decoder =
        GifDecoder::new(Cursor::new(data)).map_err(|e| OptimError::codec(ImageKind::Gif, e))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| OptimError::codec(ImageKind::Gif, e))?;

    let mut output = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut output, GIF_ENCODE_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| OptimError::codec(ImageKind::Gif, e))?;
        encoder
            .encode_frames(frames)
            .map_err(|e| OptimError::codec(ImageKind::Gif, e))?;
    }
    Ok(output)
}

/// Lossy WebP through libwebp. Animated files are returned untouched since
/// only the first frame would survive a decode.
fn compress_webp(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let decoder =
        WebPDecoder::new(Cursor::new(data)).map_err(|e| OptimError::codec(ImageKind::WebP, e))?;
    if decoder.has_animation() {
        return Ok(data.to_vec());
    }

    let img = image::DynamicImage::from_decoder(decoder)
        .map_err(|e| OptimError::codec(ImageKind::WebP, e))?;
    let (width, height) = (img.width(), img.height());

    if img.color().has_alpha() {
        encode_webp(&img.to_rgba8(), true, width, height, quality as f32)
    } else {
        encode_webp(&img.to_rgb8(), false, width, height, quality as f32)
    }
}

fn encode_webp(
    pixels: &[u8],
    alpha: bool,
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>> {
    let encoder = if alpha {
        webp::Encoder::from_rgba(pixels, width, height)
    } else {
        webp::Encoder::from_rgb(pixels, width, height)
    };
    encoder
        .encode_simple(false, quality)
        .map(|encoded| encoded.to_vec())
        .map_err(|e| OptimError::codec(ImageKind::WebP, format!("{:?}", e)))
}
