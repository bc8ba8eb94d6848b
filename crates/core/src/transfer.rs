//! Transfer requests
//!
//! A transfer request pins down everything needed to put one local file
//! into a bucket: where the bytes come from, where they go and what
//! content type the object gets.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Content type used when nothing better can be inferred
pub const OCTET_STREAM: &str = "application/octet-stream";

/// One local file headed for one object key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    /// Local file to read
    pub source_path: PathBuf,

    /// Destination bucket
    pub bucket: String,

    /// Destination object key
    pub key: String,

    /// MIME type sent with the object
    pub content_type: String,

    /// File size at the time the request was built
    pub size_bytes: u64,
}

impl TransferRequest {
    /// Build a request for an existing regular file
    ///
    /// When `key` is `None` the file's base name is used.
    pub fn for_file(source: &Path, bucket: &str, key: Option<&str>) -> Result<Self> {
        validate_bucket(bucket)?;

        let metadata = std::fs::metadata(source).map_err(|e| {
            Error::InvalidPath(format!("{}: {e}", source.display()))
        })?;
        if !metadata.is_file() {
            return Err(Error::NotAFile(source.display().to_string()));
        }

        let key = match key {
            Some(k) if k.is_empty() => {
                return Err(Error::Config("Object key cannot be empty".into()));
            }
            Some(k) => k.to_string(),
            None => base_name(source)?,
        };

        Ok(Self {
            source_path: source.to_path_buf(),
            bucket: bucket.to_string(),
            key,
            content_type: content_type_for(source),
            size_bytes: metadata.len(),
        })
    }

    /// Replace the inferred content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Reject an empty bucket name
///
/// Bucket existence is left to the store.
pub fn validate_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty() {
        return Err(Error::Config("Bucket name cannot be empty".into()));
    }
    Ok(())
}

/// Infer a MIME type from a file name, falling back to octet-stream
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// Final path component as an object key
pub fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidPath(format!("{} has no file name", path.display())))
}
