//! put command - Upload an object anonymously
//!
//! Reads the body from a file or stdin and hands it to the adapter together
//! with any declared digests and user metadata.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use anon_core::{BoxedReader, Error, PutObjectOptions, RemotePath, parse_path};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, format_size};

use super::{connect, fail};

/// Upload an object from a file or stdin
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Destination path (remote/bucket/key)
    pub target: String,

    /// Read the body from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Declared body size in bytes (defaults to the file length; unknown for stdin)
    #[arg(long)]
    pub size: Option<i64>,

    /// Hex-encoded MD5 digest of the body
    #[arg(long)]
    pub md5: Option<String>,

    /// Hex-encoded SHA-256 checksum of the body
    #[arg(long)]
    pub sha256: Option<String>,

    /// User metadata entry, may be repeated
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta)]
    pub meta: Vec<(String, String)>,

    /// Content type (guessed from the file extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    target: String,
    size_bytes: i64,
    size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<String>,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_path(&args.target).and_then(RemotePath::require_key) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, &e),
    };

    let (body, size) = match open_body(args.file.as_deref(), args.size).await {
        Ok(opened) => opened,
        Err(e) => return fail(&formatter, &e),
    };

    let adapter = match connect(&target.remote).await {
        Ok(adapter) => adapter,
        Err(e) => return fail(&formatter, &e),
    };

    let options = build_options(&args);

    match adapter
        .put_object(&target.bucket, &target.key, size, body, options)
        .await
    {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    status: "success",
                    target: target.to_string(),
                    size_bytes: info.size,
                    size_human: format_size(info.size),
                    etag: info.etag,
                });
            } else {
                formatter.success(&format!(
                    "Uploaded to {target} ({})",
                    format_size(info.size)
                ));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, &e),
    }
}

/// Open the upload body and work out its declared size
async fn open_body(file: Option<&Path>, size: Option<i64>) -> Result<(BoxedReader, i64), Error> {
    match file {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            let len = file.metadata().await?.len();
            let size = size.unwrap_or_else(|| i64::try_from(len).unwrap_or(-1));
            let body: BoxedReader = Box::pin(file);
            Ok((body, size))
        }
        None => {
            let body: BoxedReader = Box::pin(tokio::io::stdin());
            Ok((body, size.unwrap_or(-1)))
        }
    }
}

fn build_options(args: &PutArgs) -> PutObjectOptions {
    let mut options = PutObjectOptions::new();

    for (name, value) in &args.meta {
        options = options.with_metadata(name, value);
    }

    let content_type = args.content_type.clone().or_else(|| {
        args.file
            .as_deref()
            .and_then(|path| mime_guess::from_path(path).first_raw())
            .map(str::to_string)
    });
    if let Some(content_type) = content_type {
        options = options.with_metadata("content-type", content_type);
    }

    if let Some(md5) = &args.md5 {
        options = options.with_content_md5(md5);
    }
    if let Some(sha256) = &args.sha256 {
        options = options.with_content_sha256(sha256);
    }

    options
}

fn parse_meta(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid metadata '{s}': expected KEY=VALUE"))?;
    if name.is_empty() {
        return Err(format!("invalid metadata '{s}': empty key"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tokio::io::AsyncReadExt;

    use super::*;

    fn args(file: Option<&str>) -> PutArgs {
        PutArgs {
            target: "public/bucket/key".to_string(),
            file: file.map(PathBuf::from),
            size: None,
            md5: None,
            sha256: None,
            meta: Vec::new(),
            content_type: None,
        }
    }

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("owner=ops").unwrap(),
            ("owner".to_string(), "ops".to_string())
        );
        assert_eq!(
            parse_meta("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }

    #[test]
    fn test_build_options_guesses_content_type() {
        let options = build_options(&args(Some("report.json")));
        assert_eq!(
            options.user_metadata().get("content-type").map(String::as_str),
            Some("application/json")
        );

        let options = build_options(&args(None));
        assert!(options.user_metadata().is_empty());
    }

    #[test]
    fn test_build_options_digests_and_metadata() {
        let mut put = args(Some("report.json"));
        put.content_type = Some("text/plain".to_string());
        put.md5 = Some("5d41402abc4b2a76b9719d911017c592".to_string());
        put.meta = vec![("owner".to_string(), "ops".to_string())];

        let options = build_options(&put);
        assert_eq!(
            options.user_metadata().get("content-type").map(String::as_str),
            Some("text/plain")
        );
        assert_eq!(
            options.user_metadata().get("owner").map(String::as_str),
            Some("ops")
        );
        assert_eq!(
            options.content_md5(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
        assert!(options.content_sha256().is_none());
    }

    #[test]
    fn test_md5_metadata_entry_becomes_digest() {
        let mut put = args(None);
        put.meta = vec![("md5Sum".to_string(), "00".to_string())];

        let options = build_options(&put);
        assert!(options.user_metadata().is_empty());
        assert_eq!(options.content_md5(), Some("00"));
    }

    #[tokio::test]
    async fn test_open_body_uses_file_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let (mut body, size) = open_body(Some(file.path()), None).await.unwrap();
        assert_eq!(size, 5);
        let mut data = Vec::new();
        body.read_to_end(&mut data).await.unwrap();
        assert_eq!(data, b"hello");

        let (_, size) = open_body(Some(file.path()), Some(3)).await.unwrap();
        assert_eq!(size, 3);
    }

    #[tokio::test]
    async fn test_open_body_missing_file() {
        let result = open_body(Some(Path::new("/nonexistent/anongw-body")), None).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
