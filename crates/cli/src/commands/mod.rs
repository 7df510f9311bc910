//! CLI command definitions and execution
//!
//! Each object command builds an [`AnonymousAdapter`] for the named remote
//! and calls exactly one adapter operation.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use anon_core::{AnonymousAdapter, ConfigManager, Error, RemoteManager};
use anon_s3::AnonymousS3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod bucket_info;
mod completions;
mod get;
mod ls;
mod put;
mod remote;
mod stat;

/// anongw - anonymous S3 gateway client
///
/// Reads, writes and lists objects on S3-compatible services that allow
/// unauthenticated access.
#[derive(Parser, Debug)]
#[command(name = "anongw")]
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

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage anonymous endpoints
    #[command(subcommand)]
    Remote(remote::RemoteCommands),

    /// Upload an object from a file or stdin
    Put(put::PutArgs),

    /// Download an object or a byte range of it
    Get(get::GetArgs),

    /// Show object metadata
    Stat(stat::StatArgs),

    /// List one page of objects in a bucket
    Ls(ls::LsArgs),

    /// Show bucket information
    BucketInfo(bucket_info::BucketInfoArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    // Config errors surface later from the commands that need the file
    let defaults = ConfigManager::new()
        .and_then(|manager| manager.load())
        .map(|config| config.defaults)
        .unwrap_or_default();

    let output_config = OutputConfig {
        json: cli.json || defaults.output == "json",
        no_color: cli.no_color || defaults.color == "never",
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Remote(cmd) => remote::execute(cmd, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::BucketInfo(args) => bucket_info::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Build an adapter for the named remote
async fn connect(remote_name: &str) -> anon_core::Result<AnonymousAdapter> {
    let remote = RemoteManager::new()?.get(remote_name)?;
    tracing::debug!(remote = %remote.name, endpoint = %remote.endpoint, "connecting");
    let client = AnonymousS3Client::new(remote).await?;
    Ok(AnonymousAdapter::new(Arc::new(client)))
}

/// Report a failure and pick the exit code for it
fn fail(formatter: &Formatter, err: &Error) -> ExitCode {
    formatter.error(&err.to_string());
    ExitCode::from_error(err)
}
