//! Integration tests for the bup CLI
//!
//! These tests require a running S3-compatible server and an existing
//! bucket; bup does not create buckets.
//!
//! Run with:
//! ```bash
//! # Start MinIO and create a bucket
//! docker run -d --name minio -p 9000:9000 \
//!     -e MINIO_ROOT_USER=minioadmin \
//!     -e MINIO_ROOT_PASSWORD=minioadmin \
//!     minio/minio server /data
//!
//! # Run tests
//! TEST_S3_ENDPOINT=http://localhost:9000 \
//! TEST_S3_ACCESS_KEY=minioadmin \
//! TEST_S3_SECRET_KEY=minioadmin \
//! TEST_S3_BUCKET=bup-test \
//! cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

struct TestConfig {
    endpoint: String,
    access_key: String,
    secret_key: String,
    bucket: String,
}

/// Get S3 test configuration from environment
fn get_test_config() -> Option<TestConfig> {
    Some(TestConfig {
        endpoint: std::env::var("TEST_S3_ENDPOINT").ok()?,
        access_key: std::env::var("TEST_S3_ACCESS_KEY").ok()?,
        secret_key: std::env::var("TEST_S3_SECRET_KEY").ok()?,
        bucket: std::env::var("TEST_S3_BUCKET").ok()?,
    })
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{nanos:x}")
}

fn run_bup(config: &TestConfig, cwd: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bup"))
        .current_dir(cwd)
        .args(args)
        .env("S3_ACCESS_KEY", &config.access_key)
        .env("S3_SECRET_KEY", &config.secret_key)
        .env("S3_ENDPOINT", &config.endpoint)
        .env_remove("S3_BUCKET")
        .output()
        .expect("Failed to execute bup")
}

#[test]
fn test_upload_file_then_list() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: TEST_S3_* not set");
        return;
    };
    let dir = TempDir::new().unwrap();
    let key = format!("bup-it-{}.json", unique_suffix());
    std::fs::write(dir.path().join("payload.json"), br#"{"ok":true}"#).unwrap();

    let output = run_bup(
        &config,
        dir.path(),
        &[
            "upload",
            "--file",
            "payload.json",
            "--bucket",
            &config.bucket,
            "--key",
            &key,
        ],
    );
    assert!(
        output.status.success(),
        "upload failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains(&key));

    let output = run_bup(&config, dir.path(), &["list", "--bucket", &config.bucket]);
    assert!(output.status.success());
    let keys = String::from_utf8_lossy(&output.stdout);
    assert!(keys.lines().any(|line| line == key));
}

#[test]
fn test_upload_directory_with_json_output() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: TEST_S3_* not set");
        return;
    };
    let dir = TempDir::new().unwrap();
    let src = dir.path().join(format!("batch-{}", unique_suffix()));
    std::fs::create_dir(&src).unwrap();
    for i in 0..3 {
        std::fs::write(src.join(format!("part-{i}.txt")), format!("part {i}")).unwrap();
    }

    let output = run_bup(
        &config,
        dir.path(),
        &[
            "upload",
            "--dir",
            src.to_str().unwrap(),
            "--bucket",
            &config.bucket,
            "--jobs",
            "3",
            "--json",
        ],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["succeeded"], 3);
    assert_eq!(json["failed"], 0);
}

#[test]
fn test_list_missing_bucket_exits_two() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping: TEST_S3_* not set");
        return;
    };
    let dir = TempDir::new().unwrap();
    let bucket = format!("bup-missing-{}", unique_suffix());

    let output = run_bup(&config, dir.path(), &["list", "--bucket", &bucket]);
    assert_eq!(output.status.code(), Some(2));
}
