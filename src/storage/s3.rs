use super::{ObjectBody, ObjectMetadata, ObjectStore, PutObject, StorageError, StorageResult};
use crate::event::FileReference;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::time::Instant;

/// S3 storage backend
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client from the standard AWS environment.
    ///
    /// # Arguments
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g. "http://localhost:9000" for MinIO); enables path-style addressing
    pub async fn new(endpoint_url: Option<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let client = match endpoint_url {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&config),
        };

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn head(&self, file: &FileReference) -> StorageResult<ObjectMetadata> {
        let output = self
            .client
            .head_object()
            .bucket(&file.bucket)
            .key(&file.key)
            .send()
            .await
            .map_err(|e| StorageError::Head {
                bucket: file.bucket.clone(),
                key: file.key.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(ObjectMetadata {
            content_length: output
                .content_length()
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or(0),
            content_type: output.content_type().map(str::to_string),
            custom: output.metadata().cloned().unwrap_or_default(),
        })
    }

    async fn get(&self, file: &FileReference) -> StorageResult<ObjectBody> {
        let get_error = |reason: String| StorageError::Get {
            bucket: file.bucket.clone(),
            key: file.key.clone(),
            reason,
        };

        let output = self
            .client
            .get_object()
            .bucket(&file.bucket)
            .key(&file.key)
            .send()
            .await
            .map_err(|e| get_error(DisplayErrorContext(&e).to_string()))?;

        let content_type = output.content_type().map(str::to_string);
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| get_error(e.to_string()))?
            .into_bytes();

        Ok(ObjectBody {
            bytes,
            content_type,
        })
    }

    async fn put(&self, object: PutObject) -> StorageResult<()> {
        let size = object.body.len();
        let start = Instant::now();

        self.client
            .put_object()
            .acl(ObjectCannedAcl::from(object.acl.as_str()))
            .bucket(&object.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body))
            .set_content_type(object.content_type)
            .set_metadata(Some(object.metadata))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %object.bucket,
                    key = %object.key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                StorageError::Put {
                    bucket: object.bucket.clone(),
                    key: object.key.clone(),
                    reason: DisplayErrorContext(&e).to_string(),
                }
            })?;

        tracing::debug!(
            bucket = %object.bucket,
            key = %object.key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}
