//! ObjectStore trait definition
//!
//! This trait defines the store operations the upload and list workflows
//! need. It keeps the workflows independent of the S3 SDK so they can run
//! against a mock in tests.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;

use crate::error::Result;
use crate::transfer::TransferRequest;

/// One object as reported by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectEntry {
    /// Create an entry carrying only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            last_modified: None,
            etag: None,
        }
    }
}

/// One page of a bucket listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Objects on this page
    pub entries: Vec<ObjectEntry>,

    /// Whether more pages follow
    pub truncated: bool,

    /// Token to request the next page
    pub continuation_token: Option<String>,
}

/// Options for a single list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Only return keys starting with this prefix
    pub prefix: Option<String>,

    /// Maximum number of keys per page (store default when unset)
    pub max_keys: Option<i32>,

    /// Continuation token from the previous page
    pub continuation_token: Option<String>,
}

/// Store acknowledgement of a completed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutReceipt {
    /// Bucket written to
    pub bucket: String,

    /// Key written
    pub key: String,

    /// URL of the new object
    pub location: String,

    /// ETag returned by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Bytes sent
    pub size_bytes: u64,
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream one local file into the store
    async fn put_object(&self, request: &TransferRequest) -> Result<PutReceipt>;

    /// Fetch one page of object keys
    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListPage>;
}
