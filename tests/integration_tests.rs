mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use common::*;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("s3-image-optim").unwrap();
    // Keep the AWS SDK off the network and out of the user's profile
    cmd.env("AWS_REGION", "us-east-1")
        .env("AWS_ACCESS_KEY_ID", "test")
        .env("AWS_SECRET_ACCESS_KEY", "test")
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env_remove("UPLOAD_BUCKET")
        .env_remove("MAX_FILE_SIZE")
        .env_remove("PNG_OPTIM_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("handle"))
        .stdout(predicate::str::contains("optimize"));
}

#[test]
fn test_subcommand_help() {
    for subcommand in ["handle", "optimize", "compress", "sniff"] {
        cli().args([subcommand, "--help"]).assert().success();
    }
}

#[test]
fn test_optimize_missing_args() {
    cli().args(["optimize", "-b", "bucket"]).assert().failure();
}

#[test]
fn test_handle_invalid_event_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let event = temp.child("event.json");
    event.write_str("{ not json").unwrap();

    cli()
        .args(["handle", event.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input event"));
}

#[test]
fn test_handle_missing_event_file() {
    cli()
        .args(["handle", "/nonexistent/event.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read event file"));
}

#[test]
fn test_handle_event_without_images_from_stdin() {
    cli()
        .arg("handle")
        .write_stdin(event_json("bucket", &["readme.md", "notes.txt"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No supported image types"));
}

#[test]
fn test_handle_rejects_bad_png_level() {
    cli()
        .args(["handle", "--png-level", "12"])
        .write_stdin(event_json("bucket", &["a.png"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid PNG optimization level"));
}

#[test]
fn test_compress_png() {
    let temp = create_temp_directory();
    let input = write_file(temp.path(), "input.png", &png_bytes());
    let output = temp.path().join("output.png");

    cli()
        .args(["compress", input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Original size:"))
        .stdout(predicate::str::contains("Compression ratio:"));

    let written = std::fs::read(&output).unwrap();
    assert!(written.len() <= png_bytes().len());
}

#[test]
fn test_compress_with_invalid_quality() {
    let temp = create_temp_directory();
    let input = write_file(temp.path(), "input.jpg", &jpeg_bytes());
    let output = temp.path().join("output.jpg");

    cli()
        .args([
            "compress",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--jpeg-quality",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quality value"));
}

#[test]
fn test_compress_nonexistent_file() {
    cli()
        .args(["compress", "nonexistent.jpg", "output.jpg"])
        .assert()
        .failure();
}

#[test]
fn test_sniff_reports_mismatch() {
    let temp = create_temp_directory();
    let input = write_file(temp.path(), "photo.jpg", &png_bytes());

    cli()
        .args(["sniff", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Content:   png"))
        .stdout(predicate::str::contains("does not match"));
}

#[test]
fn test_sniff_svg() {
    let temp = create_temp_directory();
    let input = write_file(temp.path(), "logo.svg", &svg_bytes());

    cli()
        .args(["sniff", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Content matches the extension"));
}
