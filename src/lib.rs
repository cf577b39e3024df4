pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod formats;
pub mod local;
pub mod logger;
pub mod pipeline;
pub mod pool;
pub mod skip;
pub mod sniff;
pub mod storage;
pub mod svg;
pub mod utils;

pub use batch::{handle_event, handle_event_json, optimize_batch, BatchReport, BatchStatus};
pub use codec::CodecOptions;
pub use config::OptimConfig;
pub use error::{OptimError, Result};
pub use event::{FileReference, S3Event};
pub use formats::ImageKind;
pub use pipeline::{Optimizer, PipelineOutcome, SizeReport};
pub use pool::CodecPool;
pub use skip::SkipReason;
pub use storage::{MemoryStore, ObjectStore, S3Store};
