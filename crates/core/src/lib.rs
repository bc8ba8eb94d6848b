//! bup-core: Core library for the bucketup upload tool
//!
//! This crate provides the SDK-independent parts of bucketup:
//! - Settings read from the environment
//! - Transfer requests and content-type inference
//! - ObjectStore trait for S3 operations
//! - Upload and directory-walk workflows
//! - Paginated bucket listing
//!
//! Nothing here talks to the network directly; every store call goes
//! through [`ObjectStore`], which the S3 adapter implements and tests mock.

pub mod error;
pub mod list;
pub mod settings;
pub mod traits;
pub mod transfer;
pub mod upload;

pub use error::{Error, Result};
pub use list::list_all;
pub use settings::Settings;
#[cfg(any(test, feature = "mock"))]
pub use traits::MockObjectStore;
pub use traits::{ListOptions, ListPage, ObjectEntry, ObjectStore, PutReceipt};
pub use transfer::TransferRequest;
pub use upload::{
    upload_directory, upload_file, DirectoryOptions, FileOutcome, UploadReport,
};
