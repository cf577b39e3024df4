use anyhow::Context;
use clap::Parser;
use s3_image_optim::cli::{Args, Commands, StorageArgs};
use s3_image_optim::event::FileReference;
use s3_image_optim::local::{self, LocalOutcome};
use s3_image_optim::{batch, logger, BatchReport, CodecPool, Optimizer, S3Event, S3Store};
use std::io::Read;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose, args.log_format);

    match args.command {
        Commands::Handle { event, storage } => {
            let input = read_event(&event)?;
            let event = S3Event::from_json(&input)?;
            let optimizer = build_optimizer(&storage).await?;
            let report = batch::handle_event(optimizer, &event).await?;
            finish(report)?;
        }
        Commands::Optimize {
            bucket,
            key,
            storage,
        } => {
            let optimizer = build_optimizer(&storage).await?;
            let report =
                batch::optimize_batch(optimizer, vec![FileReference::new(bucket, key)]).await?;
            finish(report)?;
        }
        Commands::Compress {
            input,
            output,
            format,
            codec,
        } => {
            let options = codec.codec_options()?;
            if let LocalOutcome::Skipped(reason) =
                local::compress_file(&input, &output, format.as_deref(), &options)?
            {
                tracing::warn!(%reason, "nothing written");
            }
        }
        Commands::Sniff { input } => {
            local::sniff_file(&input)?;
        }
    }

    Ok(())
}

fn read_event(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read event from stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {}", source))
    }
}

async fn build_optimizer(storage: &StorageArgs) -> anyhow::Result<Arc<Optimizer>> {
    let config = storage.optim_config()?;
    let codecs = CodecPool::new(storage.codec_threads)?;
    let store = S3Store::new(storage.endpoint_url.clone()).await;
    Ok(Arc::new(Optimizer::new(Arc::new(store), config, codecs)))
}

/// Print the JSON report, then fail with the first error if there was one
fn finish(report: BatchReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&report.summary())?);
    let status = report.into_result()?;
    tracing::debug!(?status, "done");
    Ok(())
}
