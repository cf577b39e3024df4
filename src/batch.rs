use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{OptimError, Result};
use crate::event::{FileReference, S3Event};
use crate::pipeline::{Optimizer, PipelineOutcome, SizeReport};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Aggregate result of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Success,
    Skipped,
    Errored,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub file: FileReference,
    pub outcome: PipelineOutcome,
}

/// Per-file outcomes, in event record order
#[derive(Debug)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    /// Any error wins; otherwise success if anything was optimized
    pub fn status(&self) -> BatchStatus {
        if self.files.iter().any(|f| f.outcome.is_error()) {
            BatchStatus::Errored
        } else if self
            .files
            .iter()
            .any(|f| matches!(f.outcome, PipelineOutcome::Success(_)))
        {
            BatchStatus::Success
        } else {
            BatchStatus::Skipped
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome.label() == label)
            .count()
    }

    /// Collapse into the single signal the invoker sees: the first error
    /// (which file it came from is only in the logs), or the status.
    pub fn into_result(self) -> Result<BatchStatus> {
        let status = self.status();
        for file in self.files {
            if let PipelineOutcome::Errored(e) = file.outcome {
                return Err(e);
            }
        }
        Ok(status)
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            status: self.status(),
            files: self
                .files
                .iter()
                .map(|f| {
                    let (report, detail) = match &f.outcome {
                        PipelineOutcome::Success(report) => (Some(*report), None),
                        PipelineOutcome::Skipped(reason) => (None, Some(reason.to_string())),
                        PipelineOutcome::Errored(e) => (None, Some(e.to_string())),
                    };
                    FileSummary {
                        bucket: f.file.bucket.clone(),
                        key: f.file.key.clone(),
                        status: f.outcome.label(),
                        report,
                        detail,
                    }
                })
                .collect(),
        }
    }
}

/// JSON view of a `BatchReport`
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub status: BatchStatus,
    pub files: Vec<FileSummary>,
}

#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub bucket: String,
    pub key: String,
    pub status: &'static str,
    #[serde(flatten)]
    pub report: Option<SizeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Parse a raw event document and optimize every supported file in it
pub async fn handle_event_json(optimizer: Arc<Optimizer>, input: &str) -> Result<BatchReport> {
    let event = S3Event::from_json(input)?;
    handle_event(optimizer, &event).await
}

pub async fn handle_event(optimizer: Arc<Optimizer>, event: &S3Event) -> Result<BatchReport> {
    let total = event.records.len();
    let files = event.supported_files();
    if files.len() < total {
        tracing::info!(
            dropped = total - files.len(),
            supported = ?SUPPORTED_IMAGE_EXTENSIONS,
            "ignoring records without a supported image extension"
        );
    }
    optimize_batch(optimizer, files).await
}

/// Run the pipeline for every file concurrently and wait for all of them.
///
/// Successful uploads stand even when other files fail.
pub async fn optimize_batch(
    optimizer: Arc<Optimizer>,
    files: Vec<FileReference>,
) -> Result<BatchReport> {
    if files.is_empty() {
        return Err(OptimError::NoSupportedImages);
    }

    let start_time = Instant::now();
    tracing::info!(files = files.len(), "starting batch");

    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let optimizer = optimizer.clone();
            let task_file = file.clone();
            let handle =
                tokio::spawn(async move { optimizer.optimize_file(&task_file).await });
            (file, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (file, handle) in handles {
        let outcome = handle.await.unwrap_or_else(|e| {
            tracing::error!(bucket = %file.bucket, key = %file.key, error = %e, "file task failed");
            PipelineOutcome::Errored(OptimError::TaskFailed(e.to_string()))
        });
        outcomes.push(FileOutcome { file, outcome });
    }

    let report = BatchReport { files: outcomes };
    tracing::info!(
        status = ?report.status(),
        succeeded = report.count("success"),
        skipped = report.count("skipped"),
        errored = report.count("errored"),
        elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0,
        "batch complete"
    );
    Ok(report)
}
