use super::{ObjectBody, ObjectMetadata, ObjectStore, PutObject, StorageError, StorageResult};
use crate::event::FileReference;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Operations a `MemoryStore` can count or be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Head,
    Get,
    Put,
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: Option<String>,
    acl: Option<String>,
    metadata: HashMap<String, String>,
}

/// In-process object store keyed by (bucket, key)
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    failing: Mutex<HashSet<StoreOp>>,
    heads: AtomicUsize,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, as if it had just been uploaded
    pub fn insert(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        content_type: Option<&str>,
        metadata: HashMap<String, String>,
    ) {
        let object = StoredObject {
            body: body.into(),
            content_type: content_type.map(str::to_string),
            acl: None,
            metadata,
        };
        self.lock_objects()
            .insert((bucket.to_string(), key.to_string()), object);
    }

    /// Make every subsequent call of `op` fail
    pub fn fail_on(&self, op: StoreOp) {
        self.failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(op);
    }

    pub fn calls(&self, op: StoreOp) -> usize {
        match op {
            StoreOp::Head => self.heads.load(Ordering::Relaxed),
            StoreOp::Get => self.gets.load(Ordering::Relaxed),
            StoreOp::Put => self.puts.load(Ordering::Relaxed),
        }
    }

    pub fn body(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.lookup(bucket, key).map(|object| object.body)
    }

    pub fn metadata(&self, bucket: &str, key: &str) -> Option<HashMap<String, String>> {
        self.lookup(bucket, key).map(|object| object.metadata)
    }

    pub fn acl(&self, bucket: &str, key: &str) -> Option<String> {
        self.lookup(bucket, key).and_then(|object| object.acl)
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.lookup(bucket, key).and_then(|object| object.content_type)
    }

    fn lookup(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock_objects()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), StoredObject>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, op: StoreOp) -> bool {
        let counter = match op {
            StoreOp::Head => &self.heads,
            StoreOp::Get => &self.gets,
            StoreOp::Put => &self.puts,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&op)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn head(&self, file: &FileReference) -> StorageResult<ObjectMetadata> {
        let head_error = |reason: &str| StorageError::Head {
            bucket: file.bucket.clone(),
            key: file.key.clone(),
            reason: reason.to_string(),
        };

        if self.record(StoreOp::Head) {
            return Err(head_error("injected failure"));
        }
        let object = self
            .lookup(&file.bucket, &file.key)
            .ok_or_else(|| head_error("NotFound"))?;

        Ok(ObjectMetadata {
            content_length: object.body.len() as u64,
            content_type: object.content_type,
            custom: object.metadata,
        })
    }

    async fn get(&self, file: &FileReference) -> StorageResult<ObjectBody> {
        let get_error = |reason: &str| StorageError::Get {
            bucket: file.bucket.clone(),
            key: file.key.clone(),
            reason: reason.to_string(),
        };

        if self.record(StoreOp::Get) {
            return Err(get_error("injected failure"));
        }
        let object = self
            .lookup(&file.bucket, &file.key)
            .ok_or_else(|| get_error("NoSuchKey"))?;

        Ok(ObjectBody {
            bytes: object.body,
            content_type: object.content_type,
        })
    }

    async fn put(&self, object: PutObject) -> StorageResult<()> {
        if self.record(StoreOp::Put) {
            return Err(StorageError::Put {
                bucket: object.bucket,
                key: object.key,
                reason: "injected failure".to_string(),
            });
        }

        let stored = StoredObject {
            body: object.body,
            content_type: object.content_type,
            acl: Some(object.acl),
            metadata: object.metadata,
        };
        self.lock_objects().insert((object.bucket, object.key), stored);
        Ok(())
    }
}
