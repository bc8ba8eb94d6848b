//! Environment sources
//!
//! Settings come from the process environment, optionally backed by a
//! dotenv file. Variables already set in the process take precedence over
//! the file. The file is parsed into memory instead of being exported, so
//! the process environment is never mutated.

use std::collections::HashMap;
use std::path::Path;

use bup_core::{Error, Result, Settings};

/// File read from the working directory when `--env-file` is not given
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Where configuration variables are looked up
#[derive(Debug, Default)]
pub struct EnvSource {
    file_vars: HashMap<String, String>,
    use_process_env: bool,
}

impl EnvSource {
    /// Load variables from `env_file`, or from `./.env` when it exists
    ///
    /// An explicitly named file that cannot be read is an error. A missing
    /// default file is not.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let file_vars = match env_file {
            Some(path) => read_env_file(path)?,
            None => {
                let default = Path::new(DEFAULT_ENV_FILE);
                if default.is_file() {
                    read_env_file(default)?
                } else {
                    HashMap::new()
                }
            }
        };

        Ok(Self {
            file_vars,
            use_process_env: true,
        })
    }

    /// Source backed only by the given variables
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file_vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            use_process_env: false,
        }
    }

    /// Look up one variable
    pub fn get(&self, name: &str) -> Option<String> {
        self.use_process_env
            .then(|| std::env::var(name).ok())
            .flatten()
            .or_else(|| self.file_vars.get(name).cloned())
    }

    /// Build settings from this source
    pub fn settings(&self) -> Result<Settings> {
        Settings::from_lookup(|name| self.get(name))
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

    iter.map(|item| {
        item.map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staging.env");
        std::fs::write(
            &path,
            "# staging store\nBUP_TEST_ONLY_ENDPOINT=http://minio:9000\nBUP_TEST_ONLY_QUOTED=\"with spaces\"\n",
        )
        .unwrap();

        let source = EnvSource::load(Some(&path)).unwrap();
        assert_eq!(
            source.get("BUP_TEST_ONLY_ENDPOINT").as_deref(),
            Some("http://minio:9000")
        );
        assert_eq!(
            source.get("BUP_TEST_ONLY_QUOTED").as_deref(),
            Some("with spaces")
        );
        assert!(source.get("BUP_TEST_ONLY_ABSENT").is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = EnvSource::load(Some(&dir.path().join("missing.env"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_settings_from_vars() {
        let source = EnvSource::from_vars([
            ("S3_ACCESS_KEY", "minioadmin"),
            ("S3_SECRET_KEY", "minioadmin"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("S3_BUCKET", "photos"),
        ]);

        let settings = source.settings().unwrap();
        assert_eq!(settings.default_bucket.as_deref(), Some("photos"));
    }

    #[test]
    fn test_settings_missing_from_vars() {
        let source = EnvSource::from_vars([("S3_ENDPOINT", "http://localhost:9000")]);
        let err = source.settings().unwrap_err();
        assert!(matches!(err, Error::MissingConfig(ref m) if m.len() == 2));
    }
}
