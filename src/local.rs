//! The pipeline's type check and codecs applied to files on disk.

use crate::codec::{self, CodecOptions};
use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, INFO_PREFIX, ORIGINAL_SIZE_PREFIX,
    SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::error::{OptimError, Result};
use crate::formats::ImageKind;
use crate::pipeline::SizeReport;
use crate::skip::SkipReason;
use crate::sniff::{self, Detected, Resolution};
use crate::utils::format_file_size;
use std::path::Path;
use std::str::FromStr;

/// Result of a local compression
#[derive(Debug, Clone, PartialEq)]
pub enum LocalOutcome {
    Written(SizeReport),
    Skipped(SkipReason),
}

/// Pick the codec: an explicit format wins, then the output extension,
/// then the input extension.
pub fn determine_kind(input: &Path, output: &Path, format: Option<&str>) -> Result<ImageKind> {
    if let Some(format) = format {
        return ImageKind::from_str(format);
    }

    [output, input]
        .iter()
        .find_map(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageKind::from_extension)
        })
        .ok_or_else(|| OptimError::UnsupportedType(output.display().to_string()))
}

/// Compress `input` into `output`. Content that cannot be recognized or
/// converted leaves `output` unwritten.
pub fn compress_file(
    input: &Path,
    output: &Path,
    format: Option<&str>,
    options: &CodecOptions,
) -> Result<LocalOutcome> {
    if !input.exists() {
        return Err(OptimError::InvalidInput(format!(
            "file not found: {}",
            input.display()
        )));
    }

    let kind = determine_kind(input, output, format)?;
    println!("🗜️  Compressing image: {:?}", input);
    println!("📁 Output: {:?} ({})", output, kind);

    let data = std::fs::read(input)?;
    let size_before = data.len() as u64;
    println!(
        "{} {}",
        ORIGINAL_SIZE_PREFIX,
        format_file_size(size_before)
    );

    let resolved = match sniff::resolve(kind, data) {
        Resolution::Ready(resolved) => resolved,
        Resolution::Skip(reason) => {
            println!("{}  Skipped: {}", WARNING_PREFIX, reason);
            return Ok(LocalOutcome::Skipped(reason));
        }
    };
    if let Some(original_type) = &resolved.original_type {
        println!(
            "{} Converted {} content to {}",
            INFO_PREFIX, original_type, kind
        );
    }

    let compressed = codec::optimize(kind, &resolved.bytes, options)?;
    std::fs::write(output, &compressed)?;

    let report = SizeReport::new(size_before, compressed.len() as u64);
    println!(
        "{} {}",
        COMPRESSED_SIZE_PREFIX,
        format_file_size(report.size_after)
    );
    println!("{} {:.1}%", COMPRESSION_RATIO_PREFIX, report.percent_reduced);
    if report.percent_reduced > 0.0 {
        println!(
            "{} Successfully reduced file size by {:.1}%",
            SUCCESS_PREFIX, report.percent_reduced
        );
    } else {
        println!("{}  File was already as small as it gets", WARNING_PREFIX);
    }

    Ok(LocalOutcome::Written(report))
}

/// What a file's extension claims versus what its content is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffReport {
    pub claimed: Option<ImageKind>,
    pub detected: Detected,
}

impl SniffReport {
    pub fn matches(&self) -> bool {
        match (&self.claimed, &self.detected) {
            (Some(claimed), Detected::Supported(kind)) => claimed == kind,
            _ => false,
        }
    }
}

pub fn sniff_file(input: &Path) -> Result<SniffReport> {
    let data = std::fs::read(input)?;
    let claimed = input
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageKind::from_extension);
    let report = SniffReport {
        claimed,
        detected: sniff::detect(&data),
    };

    println!("{} File: {:?}", INFO_PREFIX, input);
    println!(
        "   Extension: {}",
        claimed.map_or("unsupported", |kind| kind.extension())
    );
    println!("   Content:   {}", report.detected.label());
    if report.matches() {
        println!("{} Content matches the extension", SUCCESS_PREFIX);
    } else {
        println!("{}  Content does not match the extension", WARNING_PREFIX);
    }

    Ok(report)
}
