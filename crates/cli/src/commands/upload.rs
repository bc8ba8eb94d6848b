//! upload command - Put local files into a bucket
//!
//! Uploads a single file under a chosen key, or every immediate entry of a
//! directory keyed by its base name.

use std::future::Future;
use std::path::PathBuf;

use bup_core::{
    upload_directory, upload_file, DirectoryOptions, FileOutcome, ObjectStore, Result, Settings,
    TransferRequest, UploadReport,
};
use bup_core::transfer::validate_bucket;
use bup_s3::S3Client;
use clap::{ArgGroup, Args};
use serde::Serialize;

use crate::env::EnvSource;
use crate::exit_code::ExitCode;
use crate::output::{human_size, Formatter, OutputConfig};

/// Upload a file or directory
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "dir"])))]
pub struct UploadArgs {
    /// Path to the file to upload
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Upload every file directly inside this directory (not recursive)
    #[arg(short, long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Destination bucket
    #[arg(short, long)]
    pub bucket: String,

    /// Object key for --file (default: file name)
    #[arg(short, long, conflicts_with = "dir")]
    pub key: Option<String>,

    /// Content type for uploaded files (default: guessed from extension)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Maximum concurrent uploads for --dir
    #[arg(short, long, default_value_t = 1, value_parser = parse_jobs)]
    pub jobs: usize,

    /// Only show what would be uploaded
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct UploadOutput {
    status: &'static str,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&FileOutcome> for UploadOutput {
    fn from(outcome: &FileOutcome) -> Self {
        let source = outcome.source.display().to_string();
        match &outcome.result {
            Ok(receipt) => Self {
                status: "success",
                source,
                key: Some(receipt.key.clone()),
                location: Some(receipt.location.clone()),
                size_bytes: Some(receipt.size_bytes),
                size_human: Some(human_size(receipt.size_bytes)),
                error: None,
            },
            Err(e) => Self {
                status: "error",
                source,
                key: outcome.key.clone(),
                location: None,
                size_bytes: None,
                size_human: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct DirectoryOutput {
    bucket: String,
    items: Vec<UploadOutput>,
    succeeded: usize,
    failed: usize,
    total_size_bytes: u64,
}

/// What an upload invocation will do once connected
enum Plan {
    File(TransferRequest),
    Directory(PathBuf),
}

/// Execute the upload command
pub async fn execute(args: UploadArgs, env: &EnvSource, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    run(args, env.settings(), S3Client::new, &formatter).await
}

/// Run the upload command against whatever store `connect` produces
///
/// Every precondition is checked before `connect` is called, so a bad
/// invocation never reaches the store.
pub async fn run<S, F, Fut>(
    args: UploadArgs,
    settings: Result<Settings>,
    connect: F,
    formatter: &Formatter,
) -> ExitCode
where
    S: ObjectStore,
    F: FnOnce(Settings) -> Fut,
    Fut: Future<Output = Result<S>>,
{
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    let plan = match plan(&args) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    if args.dry_run {
        return dry_run(&plan, &args.bucket, formatter);
    }

    let store = match connect(settings).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from(&e);
        }
    };

    match plan {
        Plan::File(request) => {
            formatter.upload_started(&request);
            let outcome = upload_file(&store, &request).await;
            report_file(&outcome, formatter)
        }
        Plan::Directory(dir) => {
            let options = DirectoryOptions {
                jobs: args.jobs,
                content_type: args.content_type.clone(),
            };
            let on_start = |request: &TransferRequest| formatter.upload_started(request);
            match upload_directory(&store, &dir, &args.bucket, &options, on_start).await {
                Ok(report) => report_directory(&report, &args.bucket, formatter),
                Err(e) => {
                    formatter.error(&e.to_string());
                    ExitCode::from(&e)
                }
            }
        }
    }
}

fn plan(args: &UploadArgs) -> Result<Plan> {
    validate_bucket(&args.bucket)?;

    if let Some(file) = &args.file {
        let request = TransferRequest::for_file(file, &args.bucket, args.key.as_deref())?;
        let request = match &args.content_type {
            Some(ct) => request.with_content_type(ct.clone()),
            None => request,
        };
        return Ok(Plan::File(request));
    }

    match &args.dir {
        Some(dir) if dir.is_dir() => Ok(Plan::Directory(dir.clone())),
        Some(dir) => Err(bup_core::Error::InvalidPath(format!(
            "Directory not found: {}",
            dir.display()
        ))),
        None => Err(bup_core::Error::InvalidPath(
            "Either --file or --dir is required".into(),
        )),
    }
}

fn dry_run(plan: &Plan, bucket: &str, formatter: &Formatter) -> ExitCode {
    match plan {
        Plan::File(request) => {
            formatter.planned_upload(&request.source_path, bucket, &request.key);
            ExitCode::Success
        }
        Plan::Directory(dir) => {
            let entries = match bup_core::upload::directory_entries(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    formatter.error(&e.to_string());
                    return ExitCode::UsageError;
                }
            };
            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        formatter.planned_skip(dir, &e.to_string());
                        continue;
                    }
                };
                match bup_core::transfer::base_name(&path) {
                    Ok(key) if path.is_file() => formatter.planned_upload(&path, bucket, &key),
                    Ok(_) => formatter.planned_skip(&path, "not a regular file"),
                    Err(e) => formatter.planned_skip(&path, &e.to_string()),
                }
            }
            ExitCode::Success
        }
    }
}

fn report_file(outcome: &FileOutcome, formatter: &Formatter) -> ExitCode {
    if formatter.is_json() {
        formatter.json(&UploadOutput::from(outcome));
    } else {
        formatter.upload_outcome(outcome);
    }

    if outcome.is_success() {
        ExitCode::Success
    } else {
        ExitCode::OperationFailed
    }
}

fn report_directory(report: &UploadReport, bucket: &str, formatter: &Formatter) -> ExitCode {
    if formatter.is_json() {
        formatter.json(&DirectoryOutput {
            bucket: bucket.to_string(),
            items: report.outcomes.iter().map(UploadOutput::from).collect(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            total_size_bytes: report.bytes_uploaded(),
        });
    } else {
        for outcome in &report.outcomes {
            formatter.upload_outcome(outcome);
        }
        formatter.upload_summary(report);
    }

    if report.is_success() {
        ExitCode::Success
    } else {
        ExitCode::OperationFailed
    }
}

fn parse_jobs(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err("must be at least 1".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
