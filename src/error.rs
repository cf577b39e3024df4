use crate::formats::ImageKind;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimError {
    #[error("Invalid input event: {0}")]
    InvalidInput(String),

    #[error("No supported image types in event - send in valid inputs")]
    NoSupportedImages,

    #[error("Not a supported image type: {0}")]
    UnsupportedType(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{format} compression failed: {reason}")]
    Codec { format: ImageKind, reason: String },

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid PNG optimization level: {0}. Must be between 0 and 7")]
    InvalidPngLevel(u8),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Worker task failed: {0}")]
    TaskFailed(String),
}

impl OptimError {
    pub(crate) fn codec(format: ImageKind, reason: impl ToString) -> Self {
        OptimError::Codec {
            format,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimError>;
