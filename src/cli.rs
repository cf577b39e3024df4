use crate::codec::CodecOptions;
use crate::config::OptimConfig;
use crate::error::Result;
use crate::logger::LogFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "s3-image-optim",
    about = "Optimize images in S3 as soon as they are uploaded",
    long_about = "s3-image-optim compresses images stored in S3 in place. It consumes S3 event \
                  notifications, checks each object's type against its content, runs a \
                  format-specific codec (mozjpeg, oxipng, libwebp, GIF re-quantization, SVG \
                  minification) and writes the result back tagged with `optimized=yes` so it is \
                  never processed twice.",
    version,
    after_help = "EXAMPLES:\n  \
    s3-image-optim handle event.json\n  \
    cat event.json | s3-image-optim handle --upload-bucket optimized-assets\n  \
    s3-image-optim optimize -b assets -k img/logo.png --png-level 4\n  \
    s3-image-optim compress photo.jpg photo.min.jpg --jpeg-quality 80\n  \
    s3-image-optim sniff mystery.png"
)]
pub struct Args {
    #[arg(short = 'q', long, global = true, help = "Only log errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Log every pipeline step")]
    pub verbose: bool,

    #[arg(
        long,
        value_enum,
        global = true,
        default_value_t = LogFormat::Text,
        env = "LOG_FORMAT",
        help = "Log output format"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Process an S3 event notification",
        long_about = "Read an S3 event notification (JSON with a `Records` array), optimize every \
                      record whose key has a supported image extension, and print a JSON report. \
                      Exits non-zero if any file failed."
    )]
    Handle {
        #[arg(
            default_value = "-",
            help = "Event JSON file, or - for stdin"
        )]
        event: String,

        #[command(flatten)]
        storage: StorageArgs,
    },

    #[command(
        about = "Optimize a single S3 object",
        long_about = "Run the optimization pipeline for one object, exactly as if an event had \
                      named it."
    )]
    Optimize {
        #[arg(short = 'b', long, help = "Source bucket")]
        bucket: String,

        #[arg(short = 'k', long, help = "Object key (not URL-encoded)")]
        key: String,

        #[command(flatten)]
        storage: StorageArgs,
    },

    #[command(
        about = "Compress a local image file",
        long_about = "Apply the same type check and codec the pipeline would use to a local file. \
                      The codec is chosen from --format, else the output extension."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path")]
        output: PathBuf,

        #[arg(
            short = 'f',
            long,
            help = "Codec to use (jpeg, png, gif, svg, webp)"
        )]
        format: Option<String>,

        #[command(flatten)]
        codec: CodecArgs,
    },

    #[command(
        about = "Detect a local file's real image type",
        long_about = "Compare the type claimed by a file's extension with the type found in its \
                      content."
    )]
    Sniff {
        #[arg(help = "File to inspect")]
        input: PathBuf,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CodecArgs {
    #[arg(
        long,
        env = "JPEG_QUALITY",
        help = "JPEG quality (1-100, default: 95)"
    )]
    pub jpeg_quality: Option<u8>,

    #[arg(
        long,
        env = "WEBP_QUALITY",
        help = "WebP quality (1-100, default: 75)"
    )]
    pub webp_quality: Option<u8>,

    #[arg(
        long,
        env = "PNG_OPTIM_LEVEL",
        help = "PNG optimization level (0-7, default: 7)",
        long_help = "PNG optimization level from 0 (fastest) to 7 (strongest). \
                     Levels 0-6 select the matching oxipng preset; 7 adds the strongest deflate settings."
    )]
    pub png_level: Option<u8>,
}

impl CodecArgs {
    pub fn codec_options(&self) -> Result<CodecOptions> {
        CodecOptions::new(self.jpeg_quality, self.webp_quality, self.png_level)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StorageArgs {
    #[arg(
        long,
        env = "UPLOAD_ACL",
        help = "Canned ACL for uploaded objects (default: public-read)"
    )]
    pub upload_acl: Option<String>,

    #[arg(
        long,
        env = "UPLOAD_BUCKET",
        help = "Write optimized objects to this bucket instead of the source"
    )]
    pub upload_bucket: Option<String>,

    #[arg(
        long,
        env = "MAX_FILE_SIZE",
        allow_negative_numbers = true,
        help = "Skip objects larger than this many bytes (0 or negative: no limit)"
    )]
    pub max_file_size: Option<i64>,

    #[arg(
        long,
        env = "S3_ENDPOINT_URL",
        help = "Custom S3-compatible endpoint (enables path-style addressing)"
    )]
    pub endpoint_url: Option<String>,

    #[arg(
        short = 'j',
        long,
        env = "CODEC_THREADS",
        help = "Concurrent codec workers (default: number of CPU cores)"
    )]
    pub codec_threads: Option<usize>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl StorageArgs {
    pub fn optim_config(&self) -> Result<OptimConfig> {
        OptimConfig::new(
            self.upload_acl.clone(),
            self.upload_bucket.clone(),
            self.max_file_size,
            self.codec.codec_options()?,
        )
    }
}
