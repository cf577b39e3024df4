//! Content-based type detection and correction.
//!
//! The key's extension decides which codec runs. The content is sniffed to
//! verify that claim; on a mismatch the bytes are converted into the claimed
//! container first, and the detected type is remembered for the object's
//! metadata.

use crate::constants::SVG_SNIFF_WINDOW;
use crate::error::{OptimError, Result};
use crate::formats::ImageKind;
use crate::skip::SkipReason;
use crate::svg;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// What the content actually is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detected {
    Supported(ImageKind),
    /// A raster format the optimizer has no codec for, by extension name
    Other(String),
    Unknown,
}

impl Detected {
    pub fn label(&self) -> &str {
        match self {
            Detected::Supported(kind) => kind.extension(),
            Detected::Other(extension) => extension,
            Detected::Unknown => "unknown",
        }
    }
}

/// Bytes ready for the claimed codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
    /// Set when the content had to be converted
    pub original_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ready(Resolved),
    Skip(SkipReason),
}

/// Sniff the content type from magic numbers, falling back to looking for
/// an `<svg` root in a text prefix.
pub fn detect(data: &[u8]) -> Detected {
    if let Ok(format) = image::guess_format(data) {
        return match ImageKind::from_image_format(format) {
            Some(kind) => Detected::Supported(kind),
            None => Detected::Other(
                format
                    .extensions_str()
                    .first()
                    .copied()
                    .unwrap_or("unknown")
                    .to_string(),
            ),
        };
    }

    if looks_like_svg(data) {
        return Detected::Supported(ImageKind::Svg);
    }

    Detected::Unknown
}

fn looks_like_svg(data: &[u8]) -> bool {
    let window = &data[..data.len().min(SVG_SNIFF_WINDOW)];
    // The window may cut a multi-byte character in half
    svg::has_svg_root(&String::from_utf8_lossy(window))
}

/// Decide which bytes go to the codec named by `claimed`.
///
/// Conversion failures are a skip, not an error: the object is left as is.
pub fn resolve(claimed: ImageKind, data: Vec<u8>) -> Resolution {
    let detected = detect(&data);
    match detected {
        Detected::Supported(kind) if kind == claimed => Resolution::Ready(Resolved {
            kind: claimed,
            bytes: data,
            original_type: None,
        }),
        Detected::Unknown => Resolution::Skip(SkipReason::UnrecognizedContent),
        mismatched => {
            let label = mismatched.label().to_string();
            tracing::info!(
                detected = %label,
                claimed = %claimed,
                "content does not match extension, converting"
            );
            match reencode(&data, claimed) {
                Ok(bytes) => Resolution::Ready(Resolved {
                    kind: claimed,
                    bytes,
                    original_type: Some(label),
                }),
                Err(e) => Resolution::Skip(SkipReason::ReencodeFailed {
                    detected: label,
                    message: e.to_string(),
                }),
            }
        }
    }
}

/// Decode raster content and write it out in `target`'s container
pub fn reencode(data: &[u8], target: ImageKind) -> Result<Vec<u8>> {
    let format = target.to_image_format().ok_or_else(|| {
        OptimError::UnsupportedType(format!("cannot convert raster content to {}", target))
    })?;

    let img = image::load_from_memory(data)?;
    // The JPEG encoder has no alpha channel
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)?;
    Ok(buffer)
}
