//! bucket-info command - Show bucket information

use clap::Args;

use anon_core::{RemotePath, parse_path};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, bucket_line};

use super::{connect, fail};

/// Show bucket information
#[derive(Args, Debug)]
pub struct BucketInfoArgs {
    /// Bucket path (remote/bucket)
    pub path: String,
}

/// Execute the bucket-info command
pub async fn execute(args: BucketInfoArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_path(&args.path).and_then(RemotePath::require_bucket_only) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, &e),
    };

    let adapter = match connect(&path.remote).await {
        Ok(adapter) => adapter,
        Err(e) => return fail(&formatter, &e),
    };

    match adapter.get_bucket_info(&path.bucket).await {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&info);
            } else {
                formatter.println(&bucket_line(&info));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, &e),
    }
}
