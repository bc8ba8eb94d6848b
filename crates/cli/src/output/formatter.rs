//! Terminal output for upload and list results
//!
//! Results go to stdout, diagnostics to stderr, so a listing can be piped
//! without picking up error text. In JSON mode stdout carries a single
//! document and the per-file progress lines are suppressed.

use std::path::Path;

use bup_core::{FileOutcome, TransferRequest, UploadReport};
use serde::Serialize;

use super::{human_size, OutputConfig};

const GREEN: u8 = 32;
const RED: u8 = 31;
const YELLOW: u8 = 33;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Human-readable lines are printed
    fn is_chatty(&self) -> bool {
        !self.config.quiet && !self.config.json
    }

    fn mark(&self, glyph: &str, color: u8, message: &str) -> String {
        if self.colors_enabled() {
            format!("\x1b[{color}m{glyph}\x1b[0m {message}")
        } else {
            format!("{glyph} {message}")
        }
    }

    /// Announce a transfer before it is sent
    pub fn upload_started(&self, request: &TransferRequest) {
        if self.is_chatty() {
            println!(
                "Uploading file \"{}\" to bucket \"{}\" as \"{}\"...",
                request.source_path.display(),
                request.bucket,
                request.key
            );
        }
    }

    /// Report one finished transfer
    ///
    /// Failures are printed even in quiet mode.
    pub fn upload_outcome(&self, outcome: &FileOutcome) {
        let source = outcome.source.display();
        match &outcome.result {
            Ok(receipt) if self.is_chatty() => println!(
                "{}",
                self.mark(
                    "✓",
                    GREEN,
                    &format!(
                        "{source} -> {} ({})",
                        receipt.location,
                        human_size(receipt.size_bytes)
                    )
                )
            ),
            Ok(_) => {}
            Err(e) => self.error(&format!("Failed to upload {source}: {e}")),
        }
    }

    /// Closing line for a directory upload
    pub fn upload_summary(&self, report: &UploadReport) {
        if !self.is_chatty() {
            return;
        }
        if report.is_success() {
            println!(
                "{}",
                self.mark(
                    "✓",
                    GREEN,
                    &format!(
                        "Uploaded {} file(s), {}.",
                        report.succeeded(),
                        human_size(report.bytes_uploaded())
                    )
                )
            );
        } else {
            eprintln!(
                "{}",
                self.mark(
                    "⚠",
                    YELLOW,
                    &format!(
                        "Completed with errors: {} succeeded, {} failed",
                        report.succeeded(),
                        report.failed()
                    )
                )
            );
        }
    }

    /// Dry-run line for a file that would be sent
    pub fn planned_upload(&self, source: &Path, bucket: &str, key: &str) {
        if !self.config.quiet {
            println!("Would upload: {} -> {bucket}/{key}", source.display());
        }
    }

    /// Dry-run line for an entry the walk would record as failed
    pub fn planned_skip(&self, source: &Path, reason: &str) {
        if self.is_chatty() {
            eprintln!(
                "{}",
                self.mark("⚠", YELLOW, &format!("Would skip: {}: {reason}", source.display()))
            );
        }
    }

    /// One key of a listing, alone on its line
    pub fn object_key(&self, key: &str) {
        if !self.config.quiet {
            println!("{key}");
        }
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            eprintln!("{}", self.mark("✗", RED, message));
        }
    }

    /// Print a value as the JSON document on stdout
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(json: bool, no_color: bool, quiet: bool) -> Formatter {
        Formatter::new(OutputConfig {
            json,
            no_color,
            quiet,
        })
    }

    #[test]
    fn test_colored_mark() {
        let f = formatter(false, false, false);
        assert_eq!(f.mark("✓", GREEN, "done"), "\x1b[32m✓\x1b[0m done");
    }

    #[test]
    fn test_no_color_mark() {
        let f = formatter(false, true, false);
        assert_eq!(f.mark("✗", RED, "Failed to upload a.txt"), "✗ Failed to upload a.txt");
    }

    #[test]
    fn test_json_mode_is_plain_and_silent() {
        let f = formatter(true, false, false);
        assert!(f.is_json());
        assert!(!f.colors_enabled());
        assert!(!f.is_chatty());
        assert_eq!(f.mark("⚠", YELLOW, "x"), "⚠ x");
    }

    #[test]
    fn test_quiet_mode_is_silent() {
        let f = formatter(false, false, true);
        assert!(!f.is_json());
        assert!(!f.is_chatty());
    }
}
