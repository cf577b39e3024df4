/// Image format handling for the codec families the optimizer supports
///
/// Every supported object key resolves to exactly one `ImageKind`; the kind
/// drives codec selection, re-encoding targets and log output.

use crate::error::{OptimError, Result};
use image::ImageFormat;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Codec families, one per supported extension group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Gif,
    Jpeg,
    Png,
    Svg,
    WebP,
}

impl ImageKind {
    /// Map a file extension (without the dot) to its codec family
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "gif" => Some(ImageKind::Gif),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "svg" => Some(ImageKind::Svg),
            "webp" => Some(ImageKind::WebP),
            _ => None,
        }
    }

    /// Codec family claimed by an object key's suffix
    pub fn from_key(key: &str) -> Option<Self> {
        let (_, extension) = key.rsplit_once('.')?;
        if extension.contains('/') {
            return None;
        }
        Self::from_extension(extension)
    }

    /// Canonical extension, as recorded in `originalFileType`
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Gif => "gif",
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Svg => "svg",
            ImageKind::WebP => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Gif => "image/gif",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Svg => "image/svg+xml",
            ImageKind::WebP => "image/webp",
        }
    }

    /// Raster container for the image crate; SVG has none
    pub fn to_image_format(&self) -> Option<ImageFormat> {
        match self {
            ImageKind::Gif => Some(ImageFormat::Gif),
            ImageKind::Jpeg => Some(ImageFormat::Jpeg),
            ImageKind::Png => Some(ImageFormat::Png),
            ImageKind::WebP => Some(ImageFormat::WebP),
            ImageKind::Svg => None,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Gif => Some(ImageKind::Gif),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::WebP => Some(ImageKind::WebP),
            _ => None,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Gif => "GIF",
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::Svg => "SVG",
            ImageKind::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageKind {
    type Err = OptimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| OptimError::UnsupportedType(s.to_string()))
    }
}

/// Whether an object key carries one of the supported image extensions
pub fn is_supported_key(key: &str) -> bool {
    ImageKind::from_key(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageKind::from_extension("jpg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("svg"), Some(ImageKind::Svg));
        assert_eq!(ImageKind::from_extension("webp"), Some(ImageKind::WebP));
        assert_eq!(ImageKind::from_extension("gif"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::from_extension("bmp"), None);
        assert_eq!(ImageKind::from_extension("txt"), None);
    }

    #[test]
    fn test_every_listed_extension_is_mapped() {
        for extension in crate::constants::SUPPORTED_IMAGE_EXTENSIONS {
            assert!(ImageKind::from_extension(extension).is_some(), "{}", extension);
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(ImageKind::from_key("photos/cat.jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_key("a.b/c.png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_key("logo.SVG"), Some(ImageKind::Svg));
        assert_eq!(ImageKind::from_key("b.txt"), None);
        assert_eq!(ImageKind::from_key("noext"), None);
        assert_eq!(ImageKind::from_key("dir.png/file"), None);
        assert_eq!(ImageKind::from_key("archive.png.zip"), None);
    }

    #[test]
    fn test_is_supported_key() {
        assert!(is_supported_key("a.png"));
        assert!(is_supported_key("deep/path/b.webp"));
        assert!(!is_supported_key("b.txt"));
        assert!(!is_supported_key("png"));
    }

    #[test]
    fn test_image_format_mapping() {
        assert_eq!(ImageKind::Svg.to_image_format(), None);
        assert_eq!(ImageKind::Jpeg.to_image_format(), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageKind::from_image_format(ImageFormat::WebP),
            Some(ImageKind::WebP)
        );
        assert_eq!(ImageKind::from_image_format(ImageFormat::Bmp), None);
    }

    #[test]
    fn test_from_str_and_display() {
        assert_eq!(ImageKind::from_str("jpg").unwrap(), ImageKind::Jpeg);
        assert!(matches!(
            ImageKind::from_str("tiff"),
            Err(OptimError::UnsupportedType(_))
        ));
        assert_eq!(format!("{}", ImageKind::WebP), "WebP");
        assert_eq!(ImageKind::Jpeg.extension(), "jpg");
        assert_eq!(ImageKind::Svg.mime_type(), "image/svg+xml");
    }
}
