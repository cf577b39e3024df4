use crate::constants::META_OPTIMIZED;
use crate::storage::ObjectMetadata;
use serde::Serialize;
use std::fmt;

/// Why a file was deliberately left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyOptimized,
    TooLarge { size: u64, limit: u64 },
    UnrecognizedContent,
    ReencodeFailed { detected: String, message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyOptimized => write!(f, "image is already optimized"),
            SkipReason::TooLarge { size, limit } => write!(
                f,
                "image is larger than configured threshold ({} > {} bytes)",
                size, limit
            ),
            SkipReason::UnrecognizedContent => write!(f, "content type could not be detected"),
            SkipReason::ReencodeFailed { detected, message } => {
                write!(f, "could not convert {} content: {}", detected, message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDecision {
    Proceed,
    Skip(SkipReason),
}

/// Decide from HEAD metadata whether a file should be optimized at all.
///
/// S3 lowercases user metadata keys, so the `optimized` marker is matched
/// case-insensitively; an empty value does not count as a marker.
pub fn evaluate(metadata: &ObjectMetadata, max_file_size: Option<u64>) -> SkipDecision {
    let already_optimized = metadata
        .custom
        .iter()
        .any(|(key, value)| key.eq_ignore_ascii_case(META_OPTIMIZED) && !value.is_empty());
    if already_optimized {
        return SkipDecision::Skip(SkipReason::AlreadyOptimized);
    }

    if let Some(limit) = max_file_size {
        if metadata.content_length > limit {
            return SkipDecision::Skip(SkipReason::TooLarge {
                size: metadata.content_length,
                limit,
            });
        }
    }

    SkipDecision::Proceed
}
