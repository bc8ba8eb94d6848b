//! Error types for bup-core
//!
//! One error type is threaded through every operation. Whether an error is
//! fatal (stop before touching the store) or recoverable (log, record and
//! carry on with the next file) is decided by [`Error::is_fatal`].

use thiserror::Error;

/// Result type alias for bup-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bup-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required configuration variables are unset or empty
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    /// Configuration value present but unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local path missing or unusable
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Local path exists but is not a regular file
    #[error("Not a regular file: {0}")]
    NotAFile(String),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Bucket or object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or store-side error
    #[error("Network error: {0}")]
    Network(String),

    /// Feature not supported by this client
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Whether this error is a precondition failure that must stop the
    /// process before any store call.
    ///
    /// Everything else is an operational failure: it is reported and the
    /// caller moves on.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingConfig(_)
                | Error::Config(_)
                | Error::InvalidPath(_)
                | Error::InvalidUrl(_)
                | Error::UnsupportedFeature(_)
        )
    }
}
