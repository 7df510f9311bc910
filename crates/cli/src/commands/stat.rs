//! stat command - Show object metadata
//!
//! Displays the normalized metadata the adapter reports for an object.

use clap::Args;
use serde::Serialize;

use anon_core::{ObjectInfo, RemotePath, parse_path};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, format_size, stat_lines};

use super::{connect, fail};

/// Show object metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Object path (remote/bucket/key)
    pub path: String,
}

#[derive(Debug, Serialize)]
struct StatOutput {
    #[serde(flatten)]
    info: ObjectInfo,
    size_human: String,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_path(&args.path).and_then(RemotePath::require_key) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, &e),
    };

    let adapter = match connect(&path.remote).await {
        Ok(adapter) => adapter,
        Err(e) => return fail(&formatter, &e),
    };

    match adapter.get_object_info(&path.bucket, &path.key).await {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&StatOutput {
                    size_human: format_size(info.size),
                    info,
                });
            } else {
                for line in stat_lines(&info) {
                    formatter.println(&line);
                }
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, &e),
    }
}
