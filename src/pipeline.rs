use crate::codec;
use crate::config::OptimConfig;
use crate::constants::{
    META_OPTIMIZED, META_OPTIMIZED_VALUE, META_ORIGINAL_FILE_TYPE, META_SIZE_TRIMMED_PERCENT,
};
use crate::error::{OptimError, Result};
use crate::event::FileReference;
use crate::formats::ImageKind;
use crate::pool::CodecPool;
use crate::skip::{self, SkipDecision, SkipReason};
use crate::sniff::{self, Resolution};
use crate::storage::{ObjectStore, PutObject};
use crate::utils::size_trimmed_percent;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;

/// Size metrics of one successful optimization
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeReport {
    pub size_before: u64,
    pub size_after: u64,
    pub percent_reduced: f64,
}

impl SizeReport {
    pub fn new(size_before: u64, size_after: u64) -> Self {
        Self {
            size_before,
            size_after,
            percent_reduced: size_trimmed_percent(size_before, size_after),
        }
    }
}

/// Terminal state of one file's pipeline run
#[derive(Debug)]
pub enum PipelineOutcome {
    Success(SizeReport),
    Skipped(SkipReason),
    Errored(OptimError),
}

impl PipelineOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Success(_) => "success",
            PipelineOutcome::Skipped(_) => "skipped",
            PipelineOutcome::Errored(_) => "errored",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PipelineOutcome::Errored(_))
    }
}

/// Runs the fetch → compress → upload pipeline against one object store
pub struct Optimizer {
    store: Arc<dyn ObjectStore>,
    config: OptimConfig,
    codecs: CodecPool,
}

impl Optimizer {
    pub fn new(store: Arc<dyn ObjectStore>, config: OptimConfig, codecs: CodecPool) -> Self {
        Self {
            store,
            config,
            codecs,
        }
    }

    /// Optimize one object. Never fails: errors become `Errored`.
    pub async fn optimize_file(&self, file: &FileReference) -> PipelineOutcome {
        let span = tracing::info_span!("optimize", bucket = %file.bucket, key = %file.key);

        match self.run(file).instrument(span.clone()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                span.in_scope(|| tracing::error!(error = %e, "optimization failed"));
                PipelineOutcome::Errored(e)
            }
        }
    }

    async fn run(&self, file: &FileReference) -> Result<PipelineOutcome> {
        // Validate
        let claimed = ImageKind::from_key(&file.key)
            .ok_or_else(|| OptimError::UnsupportedType(file.key.clone()))?;

        // Head
        let head = self.store.head(file).await?;
        tracing::debug!(size = head.content_length, "fetched metadata");
        if let SkipDecision::Skip(reason) = skip::evaluate(&head, self.config.max_file_size) {
            tracing::info!(%reason, "skipping");
            return Ok(PipelineOutcome::Skipped(reason));
        }

        // Fetch
        let object = self.store.get(file).await?;

        // TypeResolve
        let data = object.bytes.to_vec();
        let resolved = match self
            .codecs
            .run(move || Ok(sniff::resolve(claimed, data)))
            .await?
        {
            Resolution::Ready(resolved) => resolved,
            Resolution::Skip(reason) => {
                tracing::info!(%reason, "skipping");
                return Ok(PipelineOutcome::Skipped(reason));
            }
        };

        // Compress
        let options = self.config.codec;
        let original_type = resolved.original_type.clone();
        tracing::debug!(format = %resolved.kind, "compressing");
        let compressed = self
            .codecs
            .run(move || codec::optimize(resolved.kind, &resolved.bytes, &options))
            .await?;

        // Upload
        let report = SizeReport::new(head.content_length, compressed.len() as u64);
        let mut metadata = head.custom;
        metadata.insert(
            META_SIZE_TRIMMED_PERCENT.to_string(),
            report.percent_reduced.to_string(),
        );
        metadata.insert(META_OPTIMIZED.to_string(), META_OPTIMIZED_VALUE.to_string());
        if let Some(original_type) = original_type {
            metadata.insert(META_ORIGINAL_FILE_TYPE.to_string(), original_type);
        }

        self.store
            .put(PutObject {
                bucket: self.config.destination_bucket(&file.bucket).to_string(),
                key: file.key.clone(),
                body: Bytes::from(compressed),
                content_type: object
                    .content_type
                    .or_else(|| Some(claimed.mime_type().to_string())),
                acl: self.config.upload_acl.clone(),
                metadata,
            })
            .await?;

        tracing::info!(
            size_before = report.size_before,
            size_after = report.size_after,
            percent_reduced = report.percent_reduced,
            "optimized and saved"
        );
        Ok(PipelineOutcome::Success(report))
    }
}
