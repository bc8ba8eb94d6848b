//! bup - upload files to S3-compatible object storage
//!
//! A small command-line tool that puts local files into a bucket and lists
//! what a bucket holds. Works with MinIO, RustFS, AWS S3 and other
//! S3-compatible backends using path-style addressing.

use bucketup::commands::{self, Cli};
use bucketup::exit_code::ExitCode;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEBUG_FILTER: &str = "bup=debug,bucketup=debug,bup_core=debug,bup_s3=debug";

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() {
                ExitCode::UsageError
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let filter = if cli.debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::from_default_env()
    };

    // Logs go to stderr so listings on stdout stay pipeable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
