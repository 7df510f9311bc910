//! ls command - List one page of objects
//!
//! Shows the objects and common prefixes of a single listing page. When the
//! page is truncated the marker to continue from is printed.

use clap::Args;
use serde::Serialize;

use anon_core::{ConfigManager, ListObjectsInfo, ObjectInfo, parse_path};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, continuation_hint, listing_lines};

use super::{connect, fail};

/// List objects in a bucket
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Bucket path with optional prefix (remote/bucket[/prefix])
    pub path: String,

    /// Start listing after this key
    #[arg(long, default_value = "")]
    pub marker: String,

    /// Group keys sharing a prefix up to this delimiter
    #[arg(long, default_value = "/")]
    pub delimiter: String,

    /// List all keys under the prefix without grouping
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum entries in the page (defaults to the configured page size)
    #[arg(long)]
    pub max_keys: Option<i32>,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    objects: Vec<ObjectInfo>,
    prefixes: Vec<String>,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_marker: Option<String>,
}

impl From<ListObjectsInfo> for LsOutput {
    fn from(listing: ListObjectsInfo) -> Self {
        Self {
            objects: listing.objects,
            prefixes: listing.prefixes,
            truncated: listing.is_truncated,
            next_marker: listing.next_marker,
        }
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_path(&args.path) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, &e),
    };

    let max_keys = match args.max_keys {
        Some(max_keys) => max_keys,
        None => match ConfigManager::new().and_then(|manager| manager.load()) {
            Ok(config) => config.defaults.max_keys,
            Err(e) => return fail(&formatter, &e),
        },
    };

    let adapter = match connect(&path.remote).await {
        Ok(adapter) => adapter,
        Err(e) => return fail(&formatter, &e),
    };

    let listing = match adapter
        .list_objects(
            &path.bucket,
            &path.key,
            &args.marker,
            delimiter(&args),
            max_keys,
        )
        .await
    {
        Ok(listing) => listing,
        Err(e) => return fail(&formatter, &e),
    };

    if formatter.is_json() {
        formatter.json(&LsOutput::from(listing));
        return ExitCode::Success;
    }

    for line in listing_lines(&listing) {
        formatter.println(&line);
    }
    if let Some(hint) = continuation_hint(&listing) {
        formatter.warning(&hint);
    }

    ExitCode::Success
}

fn delimiter(args: &LsArgs) -> &str {
    if args.recursive { "" } else { &args.delimiter }
}
