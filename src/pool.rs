use crate::error::{OptimError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::oneshot;

/// Bounded pool for CPU-bound codec work.
///
/// Async file tasks hand their compression jobs here so that no more than
/// `threads` codecs run at once, however large the batch.
pub struct CodecPool {
    pool: ThreadPool,
}

impl CodecPool {
    /// Build a pool with `threads` workers, or one per CPU core
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("codec-{}", index))
            .build()
            .map_err(|e| OptimError::Config(format!("Failed to build codec pool: {}", e)))?;

        tracing::debug!(threads = num_threads, "codec pool ready");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `job` on a pool worker and await its result.
    ///
    /// A panicking job is reported as `TaskFailed` instead of taking the
    /// worker down.
    pub async fn run<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.pool.spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
                Err(OptimError::TaskFailed(panic_message(payload.as_ref())))
            });
            // The receiver is gone only if the awaiting task was dropped
            let _ = tx.send(outcome);
        });

        rx.await
            .map_err(|_| OptimError::TaskFailed("codec worker dropped the job".to_string()))?
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("codec panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("codec panicked: {}", message)
    } else {
        "codec panicked".to_string()
    }
}
