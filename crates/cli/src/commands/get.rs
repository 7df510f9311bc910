//! get command - Download an object or a byte range of it
//!
//! Writes to stdout unless an output file is given. Without `--length` the
//! object is stat'ed first and everything from `--offset` on is read.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use anon_core::{AnonymousAdapter, Error, RemotePath, parse_path};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, format_size};

use super::{connect, fail};

/// Download an object
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object path (remote/bucket/key)
    pub path: String,

    /// First byte to read
    #[arg(long, default_value_t = 0)]
    pub offset: i64,

    /// Number of bytes to read (defaults to the rest of the object)
    #[arg(long)]
    pub length: Option<i64>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    source: String,
    target: String,
    offset: i64,
    size_bytes: i64,
    size_human: String,
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_path(&args.path).and_then(RemotePath::require_key) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, &e),
    };

    let adapter = match connect(&path.remote).await {
        Ok(adapter) => adapter,
        Err(e) => return fail(&formatter, &e),
    };

    // None when the object has no bytes past the offset
    let length = match args.length {
        Some(length) => Some(length),
        None => match adapter.get_object_info(&path.bucket, &path.key).await {
            Ok(info) => remaining(info.size, args.offset),
            Err(e) => return fail(&formatter, &e),
        },
    };

    let result = match &args.output {
        Some(file) => download_to_file(&adapter, &path, args.offset, length, file).await,
        None => {
            let mut stdout = tokio::io::stdout();
            download(&adapter, &path, args.offset, length, &mut stdout).await
        }
    };

    if let Err(e) = result {
        return fail(&formatter, &e);
    }

    let length = length.unwrap_or(0);
    if let Some(file) = &args.output {
        let target = file.display().to_string();
        if formatter.is_json() {
            formatter.json(&GetOutput {
                status: "success",
                source: path.to_string(),
                target,
                offset: args.offset,
                size_bytes: length,
                size_human: format_size(length),
            });
        } else {
            formatter.success(&format!(
                "Downloaded {path} to {target} ({})",
                format_size(length)
            ));
        }
    }

    ExitCode::Success
}

async fn download_to_file(
    adapter: &AnonymousAdapter,
    path: &RemotePath,
    offset: i64,
    length: Option<i64>,
    file: &std::path::Path,
) -> Result<(), Error> {
    let mut out = tokio::fs::File::create(file).await?;
    download(adapter, path, offset, length, &mut out).await
}

async fn download<W>(
    adapter: &AnonymousAdapter,
    path: &RemotePath,
    offset: i64,
    length: Option<i64>,
    writer: &mut W,
) -> Result<(), Error>
where
    W: tokio::io::AsyncWrite + Unpin + Send,
{
    let Some(length) = length else {
        return Ok(());
    };
    adapter
        .get_object(&path.bucket, &path.key, offset, length, writer)
        .await
}

/// Bytes left in an object of `size` after `offset`, or `None` when the
/// offset is at or past the end
fn remaining(size: i64, offset: i64) -> Option<i64> {
    let left = size.saturating_sub(offset);
    (left > 0).then_some(left)
}
