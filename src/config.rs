use crate::codec::CodecOptions;
use crate::constants::DEFAULT_UPLOAD_ACL;
use crate::error::{OptimError, Result};

/// Settings shared by every pipeline run of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct OptimConfig {
    /// Canned ACL applied to uploaded objects
    pub upload_acl: String,
    /// Write results here instead of back to the source bucket
    pub upload_bucket: Option<String>,
    /// Objects larger than this many bytes are skipped
    pub max_file_size: Option<u64>,
    pub codec: CodecOptions,
}

impl Default for OptimConfig {
    fn default() -> Self {
        Self {
            upload_acl: DEFAULT_UPLOAD_ACL.to_string(),
            upload_bucket: None,
            max_file_size: None,
            codec: CodecOptions::default(),
        }
    }
}

impl OptimConfig {
    /// # Arguments
    /// * `max_file_size` - Zero or negative values mean "no limit", matching
    ///   the `MAX_FILE_SIZE=-1` convention of existing deployments
    pub fn new(
        upload_acl: Option<String>,
        upload_bucket: Option<String>,
        max_file_size: Option<i64>,
        codec: CodecOptions,
    ) -> Result<Self> {
        let upload_acl = upload_acl.unwrap_or_else(|| DEFAULT_UPLOAD_ACL.to_string());
        if upload_acl.trim().is_empty() {
            return Err(OptimError::Config("upload ACL must not be empty".to_string()));
        }

        Ok(Self {
            upload_acl,
            upload_bucket: upload_bucket.filter(|bucket| !bucket.is_empty()),
            max_file_size: max_file_size
                .filter(|&size| size > 0)
                .and_then(|size| u64::try_from(size).ok()),
            codec,
        })
    }

    /// Destination bucket for an object read from `source_bucket`
    pub fn destination_bucket<'a>(&'a self, source_bucket: &'a str) -> &'a str {
        self.upload_bucket.as_deref().unwrap_or(source_bucket)
    }
}
