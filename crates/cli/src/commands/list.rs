//! list command - List object keys in a bucket
//!
//! Prints every key in the bucket, one per line. The bucket comes from
//! --bucket or, failing that, from S3_BUCKET.

use std::future::Future;

use bup_core::settings::ENV_BUCKET;
use bup_core::{list_all, ObjectEntry, ObjectStore, Result, Settings};
use bup_s3::S3Client;
use clap::Args;
use serde::Serialize;

use crate::env::EnvSource;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List objects in a bucket
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Bucket to list (default: S3_BUCKET)
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Only list keys starting with this prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Keys requested per page (store default when unset)
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=1000))]
    pub page_size: Option<i32>,
}

/// Output structure for list command (JSON format)
#[derive(Debug, Serialize)]
struct ListOutput {
    bucket: String,
    items: Vec<ObjectEntry>,
    total_objects: usize,
}

/// Execute the list command
pub async fn execute(args: ListArgs, env: &EnvSource, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    run(args, env.settings(), S3Client::new, &formatter).await
}

/// Run the list command against whatever store `connect` produces
pub async fn run<S, F, Fut>(
    args: ListArgs,
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

    let Some(bucket) = settings.resolve_bucket(args.bucket.as_deref()) else {
        formatter.error(&format!(
            "No bucket name provided. Use --bucket <name> or set {ENV_BUCKET}."
        ));
        return ExitCode::UsageError;
    };

    let store = match connect(settings).await {
        Ok(s) => s,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from(&e);
        }
    };

    let entries = match list_all(&store, &bucket, args.prefix.as_deref(), args.page_size).await {
        Ok(entries) => entries,
        Err(e) => {
            formatter.error(&format!("Failed to list objects in {bucket}: {e}"));
            return ExitCode::OperationFailed;
        }
    };

    if formatter.is_json() {
        formatter.json(&ListOutput {
            bucket,
            total_objects: entries.len(),
            items: entries,
        });
    } else {
        for entry in &entries {
            formatter.object_key(&entry.key);
        }
    }

    ExitCode::Success
}
