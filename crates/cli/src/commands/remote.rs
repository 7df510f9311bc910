//! Remote management commands
//!
//! Remotes are named references to S3-compatible endpoints that serve
//! anonymous requests. They carry no credentials.

use clap::Subcommand;
use serde::Serialize;

use anon_core::{BucketLookup, Error, Remote, RemoteManager};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

use super::fail;

/// Remote subcommands for managing anonymous endpoints
#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// Add or update a remote
    Set(SetArgs),

    /// List all configured remotes
    List(ListArgs),

    /// Remove a remote
    Remove(RemoveArgs),
}

/// Arguments for the `remote set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Remote name (e.g., "public", "mirror")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000", "https://s3.amazonaws.com")
    pub endpoint: String,

    /// Region (default: us-east-1)
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket lookup style: auto, path, or dns
    #[arg(long, default_value = "auto", value_parser = ["auto", "path", "dns"])]
    pub bucket_lookup: String,
}

/// Arguments for the `remote list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including region and lookup style
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `remote remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the remote to remove
    pub name: String,
}

/// JSON output for remote list
#[derive(Serialize)]
struct RemoteListOutput {
    remotes: Vec<RemoteInfo>,
}

#[derive(Serialize)]
struct RemoteInfo {
    name: String,
    endpoint: String,
    region: String,
    bucket_lookup: String,
}

impl From<&Remote> for RemoteInfo {
    fn from(remote: &Remote) -> Self {
        Self {
            name: remote.name.clone(),
            endpoint: remote.endpoint.clone(),
            region: remote.region.clone(),
            bucket_lookup: remote.bucket_lookup.to_string(),
        }
    }
}

/// JSON output for remote set/remove operations
#[derive(Serialize)]
struct RemoteOperationOutput {
    success: bool,
    remote: String,
    message: String,
}

/// Execute a remote subcommand
pub async fn execute(cmd: RemoteCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match RemoteManager::new() {
        Ok(manager) => manager,
        Err(e) => return fail(&formatter, &e),
    };

    let result = match cmd {
        RemoteCommands::Set(args) => execute_set(args, &manager, &formatter),
        RemoteCommands::List(args) => execute_list(args, &manager, &formatter),
        RemoteCommands::Remove(args) => execute_remove(args, &manager, &formatter),
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => fail(&formatter, &e),
    }
}

fn build_remote(args: SetArgs) -> Result<Remote, Error> {
    let mut remote = Remote::new(args.name, args.endpoint);
    remote.region = args.region;
    remote.bucket_lookup = args.bucket_lookup.parse::<BucketLookup>()?;
    remote.validate()?;
    Ok(remote)
}

/// Store the remote and describe whether it was added or replaced
fn save_remote(manager: &RemoteManager, remote: Remote) -> Result<String, Error> {
    let verb = if manager.exists(&remote.name)? {
        "updated"
    } else {
        "configured"
    };
    let message = format!("Remote '{}' {verb} successfully", remote.name);
    manager.set(remote)?;
    Ok(message)
}

fn execute_set(args: SetArgs, manager: &RemoteManager, formatter: &Formatter) -> Result<(), Error> {
    let remote = build_remote(args)?;
    let name = remote.name.clone();
    let message = save_remote(manager, remote)?;

    if formatter.is_json() {
        formatter.json(&RemoteOperationOutput {
            success: true,
            remote: name,
            message,
        });
    } else {
        formatter.success(&message);
    }
    Ok(())
}

fn execute_list(args: ListArgs, manager: &RemoteManager, formatter: &Formatter) -> Result<(), Error> {
    let remotes = manager.list()?;

    if formatter.is_json() {
        formatter.json(&RemoteListOutput {
            remotes: remotes.iter().map(RemoteInfo::from).collect(),
        });
    } else if remotes.is_empty() {
        formatter.println("No remotes configured.");
    } else if args.long {
        for remote in &remotes {
            formatter.println(&format!(
                "{:<12} {} (region: {}, lookup: {})",
                remote.name, remote.endpoint, remote.region, remote.bucket_lookup
            ));
        }
    } else {
        for remote in &remotes {
            formatter.println(&format!("{:<12} {}", remote.name, remote.endpoint));
        }
    }
    Ok(())
}

fn execute_remove(args: RemoveArgs, manager: &RemoteManager, formatter: &Formatter) -> Result<(), Error> {
    manager.remove(&args.name)?;

    let message = format!("Remote '{}' removed successfully", args.name);
    if formatter.is_json() {
        formatter.json(&RemoteOperationOutput {
            success: true,
            remote: args.name,
            message,
        });
    } else {
        formatter.success(&message);
    }
    Ok(())
}
