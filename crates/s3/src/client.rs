//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bup-core.

use async_trait::async_trait;
use aws_sdk_s3::config::RequestChecksumCalculation;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;

use bup_core::settings::SIGNATURE_V4;
use bup_core::{
    Error, ListOptions, ListPage, ObjectEntry, ObjectStore, PutReceipt, Result, Settings,
    TransferRequest,
};

/// S3 client wrapper
///
/// Built once per process from [`Settings`] and shared by reference.
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    settings: Settings,
}

impl S3Client {
    /// Create a new S3 client from settings
    ///
    /// Only builds the SDK configuration; no request is sent.
    pub async fn new(settings: Settings) -> Result<Self> {
        if settings.signature != SIGNATURE_V4 {
            return Err(Error::UnsupportedFeature(format!(
                "signature version '{}' (only {SIGNATURE_V4} is supported)",
                settings.signature
            )));
        }

        let credentials = aws_credential_types::Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None, // session token
            None, // expiry
            "bup-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint.as_str())
            .load()
            .await;

        // Path-style addressing; checksums only where the operation requires one
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(settings.force_path_style)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();

        tracing::debug!(
            endpoint = %settings.endpoint,
            region = %settings.region,
            path_style = settings.force_path_style,
            "created S3 client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            settings,
        })
    }

    /// Settings the client was built from
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(&self, request: &TransferRequest) -> Result<PutReceipt> {
        let body = ByteStream::from_path(&request.source_path)
            .await
            .map_err(|e| {
                Error::General(format!(
                    "Failed to open {}: {e}",
                    request.source_path.display()
                ))
            })?;

        let response = self
            .inner
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .content_type(&request.content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, &request.bucket))?;

        let location = self
            .settings
            .object_url(&request.bucket, &request.key)?
            .to_string();

        Ok(PutReceipt {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
            location,
            etag: response.e_tag().map(|e| e.trim_matches('"').to_string()),
            size_bytes: request.size_bytes,
        })
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListPage> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if let Some(prefix) = &options.prefix {
            request = request.prefix(prefix);
        }

        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }

        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket))?;

        let entries = response
            .contents()
            .iter()
            .map(|object| {
                let mut entry = ObjectEntry::new(object.key().unwrap_or_default());
                entry.size_bytes = object.size();
                entry.last_modified = object
                    .last_modified()
                    .and_then(|m| jiff::Timestamp::from_second(m.secs()).ok());
                entry.etag = object.e_tag().map(|e| e.trim_matches('"').to_string());
                entry
            })
            .collect();

        Ok(ListPage {
            entries,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }
}

/// Map an SDK failure onto the core error kinds
///
/// The message keeps the SDK's full error chain.
fn map_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    classify(code.as_deref(), message, bucket)
}

fn classify(code: Option<&str>, message: String, bucket: &str) -> Error {
    match code {
        Some("NoSuchBucket") => Error::NotFound(format!("Bucket not found: {bucket}: {message}")),
        Some("NoSuchKey" | "NotFound") => Error::NotFound(message),
        Some(
            "AccessDenied"
            | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch"
            | "InvalidToken"
            | "ExpiredToken",
        ) => Error::Auth(message),
        _ => Error::Network(message),
    }
}
