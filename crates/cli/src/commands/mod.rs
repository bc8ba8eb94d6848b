//! CLI command definitions and execution
//!
//! Each command resolves its settings, builds one client and hands it to
//! the workflows in bup-core. Exit codes are decided here and nowhere else.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::env::EnvSource;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

pub mod list;
pub mod upload;

/// bup - upload files to S3-compatible object storage
///
/// Credentials and endpoint are read from S3_ACCESS_KEY, S3_SECRET_KEY and
/// S3_ENDPOINT, or from a .env file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "bup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Read configuration variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file, or every file directly inside a directory
    Upload(upload::UploadArgs),

    /// List object keys in a bucket
    List(list::ListArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    let env = match EnvSource::load(cli.env_file.as_deref()) {
        Ok(env) => env,
        Err(e) => {
            Formatter::new(output_config).error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    tracing::debug!(env_file = ?cli.env_file, command = ?cli.command, "dispatching command");

    match cli.command {
        Commands::Upload(args) => upload::execute(args, &env, output_config).await,
        Commands::List(args) => list::execute(args, &env, output_config).await,
    }
}
