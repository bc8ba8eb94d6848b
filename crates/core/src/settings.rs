//! Connection settings
//!
//! Settings describe one S3-compatible endpoint: where it lives, how to sign
//! requests and which bucket to fall back to when a command does not name
//! one. They are read once from the process environment and passed by
//! reference to whatever needs them.

use url::Url;

use crate::error::{Error, Result};

/// Access key variable
pub const ENV_ACCESS_KEY: &str = "S3_ACCESS_KEY";
/// Secret key variable
pub const ENV_SECRET_KEY: &str = "S3_SECRET_KEY";
/// Endpoint URL variable
pub const ENV_ENDPOINT: &str = "S3_ENDPOINT";
/// Default bucket variable
pub const ENV_BUCKET: &str = "S3_BUCKET";
/// Signing region variable
pub const ENV_REGION: &str = "S3_REGION";

/// The only request signature scheme the client speaks
pub const SIGNATURE_V4: &str = "v4";

const DEFAULT_REGION: &str = "us-east-1";

/// Settings for a single S3-compatible endpoint
#[derive(Clone)]
pub struct Settings {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// S3 endpoint URL
    pub endpoint: Url,

    /// Region used for request signing
    pub region: String,

    /// Bucket used when a command does not name one
    pub default_bucket: Option<String>,

    /// Address buckets as a path segment instead of a subdomain
    pub force_path_style: bool,

    /// Signature version, always "v4"
    pub signature: String,
}

impl Settings {
    /// Create settings with the required fields and fixed transport options
    pub fn new(
        endpoint: &str,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            endpoint: parse_endpoint(endpoint)?,
            region: DEFAULT_REGION.to_string(),
            default_bucket: None,
            force_path_style: true,
            signature: SIGNATURE_V4.to_string(),
        })
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    ///
    /// Empty values count as unset. Every missing required variable is
    /// reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let access_key = get(ENV_ACCESS_KEY);
        let secret_key = get(ENV_SECRET_KEY);
        let endpoint = get(ENV_ENDPOINT);

        let (Some(access_key), Some(secret_key), Some(endpoint)) =
            (access_key.clone(), secret_key.clone(), endpoint.clone())
        else {
            let missing = [
                (ENV_ACCESS_KEY, access_key.is_none()),
                (ENV_SECRET_KEY, secret_key.is_none()),
                (ENV_ENDPOINT, endpoint.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(Error::MissingConfig(missing));
        };

        let mut settings = Self::new(&endpoint, access_key, secret_key)?;
        if let Some(region) = get(ENV_REGION) {
            settings.region = region;
        }
        settings.default_bucket = get(ENV_BUCKET);

        Ok(settings)
    }

    /// Pick the bucket named on the command line, else the configured default
    pub fn resolve_bucket(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_bucket.clone())
    }

    /// Path-style URL of an object on this endpoint
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("Endpoint cannot be a base: {}", self.endpoint))
            })?;
            segments.pop_if_empty().push(bucket).extend(key.split('/'));
        }
        Ok(url)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .field("default_bucket", &self.default_bucket)
            .field("force_path_style", &self.force_path_style)
            .field("signature", &self.signature)
            .finish()
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "{ENV_ENDPOINT} must be an http(s) URL, got '{endpoint}'"
        )));
    }
    Ok(url)
}
