//! Object storage abstraction
//!
//! The pipeline only needs HEAD, GET and PUT. `S3Store` talks to S3 (or an
//! S3-compatible endpoint); `MemoryStore` keeps objects in process for tests
//! and dry runs.

mod memory;
mod s3;

pub use memory::{MemoryStore, StoreOp};
pub use s3::S3Store;

use crate::event::FileReference;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HEAD {bucket}/{key} failed: {reason}")]
    Head {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("GET {bucket}/{key} failed: {reason}")]
    Get {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("PUT {bucket}/{key} failed: {reason}")]
    Put {
        bucket: String,
        key: String,
        reason: String,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object metadata as returned by HEAD
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
    pub content_length: u64,
    pub content_type: Option<String>,
    /// User metadata (`x-amz-meta-*`)
    pub custom: HashMap<String, String>,
}

/// Object content as returned by GET
#[derive(Debug, Clone)]
pub struct ObjectBody {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// A full-object write
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub acl: String,
    pub metadata: HashMap<String, String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn head(&self, file: &FileReference) -> StorageResult<ObjectMetadata>;

    async fn get(&self, file: &FileReference) -> StorageResult<ObjectBody>;

    async fn put(&self, object: PutObject) -> StorageResult<()>;
}
