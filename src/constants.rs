pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];

pub const DEFAULT_UPLOAD_ACL: &str = "public-read";

pub const DEFAULT_JPEG_QUALITY: u8 = 95;
pub const DEFAULT_WEBP_QUALITY: u8 = 75;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_PNG_OPTIM_LEVEL: u8 = 7;
pub const MAX_PNG_OPTIM_LEVEL: u8 = 7;
/// Highest oxipng preset; level 7 maps onto it with a stronger deflater.
pub const MAX_OXIPNG_PRESET: u8 = 6;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;

/// 1 is best quality and slowest, 30 is fastest.
pub const GIF_ENCODE_SPEED: i32 = 10;

/// How far into a document to look for an `<svg` root. Editor exports can
/// carry a long DOCTYPE entity block before it.
pub const SVG_SNIFF_WINDOW: usize = 64 * 1024;

// Custom object metadata written back on upload
pub const META_OPTIMIZED: &str = "optimized";
pub const META_OPTIMIZED_VALUE: &str = "yes";
pub const META_SIZE_TRIMMED_PERCENT: &str = "sizeTrimmedPercent";
pub const META_ORIGINAL_FILE_TYPE: &str = "originalFileType";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const INFO_PREFIX: &str = "📋";
