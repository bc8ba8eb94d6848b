//! Upload workflows
//!
//! [`upload_file`] puts a single file and never fails the caller: transport
//! and store errors are logged and returned inside the [`FileOutcome`].
//! [`upload_directory`] runs it once per immediate directory entry and
//! collects the outcomes into an [`UploadReport`]. Only a directory that
//! cannot be read at all is an error of the workflow itself.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};

use crate::error::{Error, Result};
use crate::traits::{ObjectStore, PutReceipt};
use crate::transfer::{validate_bucket, TransferRequest};

/// Result of uploading one file or directory entry
#[derive(Debug)]
pub struct FileOutcome {
    /// Local path that was attempted
    pub source: PathBuf,

    /// Destination key, if one could be derived
    pub key: Option<String>,

    /// Store receipt or the reason the upload failed
    pub result: Result<PutReceipt>,
}

impl FileOutcome {
    /// Whether the store acknowledged the upload
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate of per-entry outcomes
#[derive(Debug, Default)]
pub struct UploadReport {
    /// One outcome per attempted entry, in attempt order
    pub outcomes: Vec<FileOutcome>,
}

impl UploadReport {
    /// Number of uploads the store acknowledged
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of uploads that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether every attempt succeeded
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Total bytes acknowledged by the store
    pub fn bytes_uploaded(&self) -> u64 {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.size_bytes)
            .sum()
    }
}

/// Options for directory uploads
#[derive(Debug, Clone)]
pub struct DirectoryOptions {
    /// Maximum uploads in flight at once
    pub jobs: usize,

    /// Content type applied to every entry instead of the inferred one
    pub content_type: Option<String>,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            content_type: None,
        }
    }
}

/// Upload one prepared request
pub async fn upload_file<S>(store: &S, request: &TransferRequest) -> FileOutcome
where
    S: ObjectStore + ?Sized,
{
    tracing::debug!(
        source = %request.source_path.display(),
        bucket = %request.bucket,
        key = %request.key,
        content_type = %request.content_type,
        "uploading file"
    );

    let result = store.put_object(request).await;
    match &result {
        Ok(receipt) => tracing::info!(location = %receipt.location, "upload complete"),
        Err(e) => tracing::warn!(
            source = %request.source_path.display(),
            error = %e,
            "upload failed"
        ),
    }

    FileOutcome {
        source: request.source_path.clone(),
        key: Some(request.key.clone()),
        result,
    }
}

/// List the immediate entries of a directory in enumeration order
///
/// Failing to open the directory is an error. A failure while reading a
/// single entry is returned in place of that entry.
pub fn directory_entries(dir: &Path) -> Result<Vec<std::io::Result<PathBuf>>> {
    let read_dir = std::fs::read_dir(dir)
        .map_err(|e| Error::InvalidPath(format!("{}: {e}", dir.display())))?;

    Ok(read_dir.map(|entry| entry.map(|e| e.path())).collect())
}

/// Upload every immediate entry of `dir` into `bucket`, keyed by base name
///
/// Nested directories are not descended into. Each subdirectory yields a
/// failed outcome without any store call; the walk continues regardless.
/// `on_start` sees each request just before it is sent.
pub async fn upload_directory<S, F>(
    store: &S,
    dir: &Path,
    bucket: &str,
    options: &DirectoryOptions,
    on_start: F,
) -> Result<UploadReport>
where
    S: ObjectStore + ?Sized,
    F: Fn(&TransferRequest),
{
    validate_bucket(bucket)?;

    if !dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let entries = directory_entries(dir)?;
    tracing::debug!(dir = %dir.display(), entries = entries.len(), "walking directory");

    let outcomes: Vec<FileOutcome> = stream::iter(entries)
        .map(|entry| upload_entry(store, dir, entry, bucket, options, &on_start))
        .buffered(options.jobs.max(1))
        .collect()
        .await;

    Ok(UploadReport { outcomes })
}

async fn upload_entry<S, F>(
    store: &S,
    dir: &Path,
    entry: std::io::Result<PathBuf>,
    bucket: &str,
    options: &DirectoryOptions,
    on_start: &F,
) -> FileOutcome
where
    S: ObjectStore + ?Sized,
    F: Fn(&TransferRequest),
{
    let path = match entry {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
            return FileOutcome {
                source: dir.to_path_buf(),
                key: None,
                result: Err(Error::Io(e)),
            };
        }
    };

    match TransferRequest::for_file(&path, bucket, None) {
        Ok(request) => {
            let request = match &options.content_type {
                Some(ct) => request.with_content_type(ct.clone()),
                None => request,
            };
            on_start(&request);
            upload_file(store, &request).await
        }
        Err(e) => {
            tracing::warn!(source = %path.display(), error = %e, "skipping entry");
            FileOutcome {
                key: crate::transfer::base_name(&path).ok(),
                source: path,
                result: Err(e),
            }
        }
    }
}
