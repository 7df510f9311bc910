//! Anonymous S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the BackendClient trait from anon-core.
//! The SDK is configured without a credentials provider, so requests go out
//! unsigned even when AWS credentials are present in the environment.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::RequestChecksumCalculation;
use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::operation::list_objects::ListObjectsOutput;
use aws_sdk_s3::primitives::ByteStream;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::io::AsyncReadExt;
use tracing::debug;

use anon_core::{
    BackendClient, BackendError, BackendErrorKind, BoxedReader, BucketEntry, ByteRange,
    ListBucketResult, ObjectStat, PutObjectInput, Remote, Result,
};

use crate::error::classify;

/// Upper bound on the buffer reserved up front for a declared upload size
const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

/// Unauthenticated S3 client
pub struct AnonymousS3Client {
    inner: aws_sdk_s3::Client,
}

impl AnonymousS3Client {
    /// Create a new client from a remote definition
    pub async fn new(remote: Remote) -> Result<Self> {
        remote.validate()?;

        let retry = remote.retry_config();
        let timeout = remote.timeout_config();

        let retry_config = aws_config::retry::RetryConfig::standard()
            .with_max_attempts(retry.max_attempts.max(1))
            .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(retry.max_backoff_ms));

        let timeout_config = aws_config::timeout::TimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(timeout.connect_ms))
            .read_timeout(Duration::from_millis(timeout.read_ms))
            .build();

        // No credentials provider: nothing is ever signed
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .no_credentials()
            .region(aws_config::Region::new(remote.region.clone()))
            .endpoint_url(&remote.endpoint)
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .load()
            .await;

        // Only send the checksums the caller supplied
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(remote.bucket_lookup.force_path_style())
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();

        debug!(
            remote = %remote.name,
            endpoint = %remote.endpoint,
            "anonymous S3 client initialized"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl BackendClient for AnonymousS3Client {
    async fn put_object(&self, input: PutObjectInput) -> std::result::Result<ObjectStat, BackendError> {
        let PutObjectInput {
            bucket,
            key,
            size,
            body,
            content_md5,
            content_sha256,
            metadata,
        } = input;

        let data = read_body(body, size).await?;
        let length = data.len() as i64;
        let (content_type, user_metadata) = split_content_type(metadata);

        debug!(bucket = %bucket, key = %key, length, "S3 put_object");

        let mut request = self
            .inner
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .content_length(length)
            .body(ByteStream::from(data))
            .set_metadata((!user_metadata.is_empty()).then(|| user_metadata.clone()));

        if !content_md5.is_empty() {
            request = request.content_md5(BASE64.encode(&content_md5));
        }
        if !content_sha256.is_empty() {
            request = request.checksum_sha256(BASE64.encode(&content_sha256));
        }
        if let Some(ct) = &content_type {
            request = request.content_type(ct);
        }

        let response = request.send().await.map_err(classify)?;

        Ok(ObjectStat {
            key,
            size: length,
            // PutObject responses carry no Last-Modified
            last_modified: None,
            etag: response.e_tag().map(str::to_string),
            content_type,
            content_encoding: None,
            storage_class: None,
            user_metadata,
        })
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: ByteRange,
    ) -> std::result::Result<BoxedReader, BackendError> {
        debug!(bucket, key, range = %range.to_header(), "S3 get_object");

        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .range(range.to_header())
            .send()
            .await
            .map_err(classify)?;

        Ok(Box::pin(response.body.into_async_read()))
    }

    async fn stat_object(&self, bucket: &str, key: &str) -> std::result::Result<ObjectStat, BackendError> {
        debug!(bucket, key, "S3 head_object");

        let response = self
            .inner
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(classify)?;

        Ok(stat_from_head(key, &response))
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> std::result::Result<ListBucketResult, BackendError> {
        debug!(bucket, prefix, marker, delimiter, max_keys, "S3 list_objects");

        let mut request = self.inner.list_objects().bucket(bucket);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if !marker.is_empty() {
            request = request.marker(marker);
        }
        if !delimiter.is_empty() {
            request = request.delimiter(delimiter);
        }
        if max_keys > 0 {
            request = request.max_keys(max_keys);
        }

        let response = request.send().await.map_err(classify)?;

        Ok(listing_from_output(&response))
    }

    async fn bucket_exists(&self, bucket: &str) -> std::result::Result<bool, BackendError> {
        debug!(bucket, "S3 head_bucket");

        match self.inner.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = classify(e);
                match err.kind() {
                    BackendErrorKind::NoSuchBucket | BackendErrorKind::NoSuchKey => Ok(false),
                    _ => Err(err),
                }
            }
        }
    }

    async fn list_buckets(&self) -> std::result::Result<Vec<BucketEntry>, BackendError> {
        debug!("S3 list_buckets");

        let mut buckets = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .inner
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(classify)?;

            buckets.extend(response.buckets().iter().map(|b| BucketEntry {
                name: b.name().unwrap_or_default().to_string(),
                creation_date: b
                    .creation_date()
                    .and_then(to_timestamp)
                    .unwrap_or(jiff::Timestamp::UNIX_EPOCH),
            }));

            match response.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(buckets)
    }
}

/// Read the upload body, holding it to the declared size when one is known
async fn read_body(body: BoxedReader, size: Option<u64>) -> std::result::Result<Vec<u8>, BackendError> {
    let mut data = Vec::with_capacity(size.map_or(0, |s| s.min(MAX_PREALLOC) as usize));

    match size {
        Some(expected) => {
            body.take(expected)
                .read_to_end(&mut data)
                .await
                .map_err(BackendError::from_io)?;
            if (data.len() as u64) < expected {
                return Err(BackendError::new(
                    BackendErrorKind::IncompleteBody,
                    format!("body ended after {} of {expected} declared bytes", data.len()),
                ));
            }
        }
        None => {
            let mut body = body;
            body.read_to_end(&mut data)
                .await
                .map_err(BackendError::from_io)?;
        }
    }

    Ok(data)
}

/// Pull a `content-type` entry out of user metadata
fn split_content_type(
    mut metadata: HashMap<String, String>,
) -> (Option<String>, HashMap<String, String>) {
    let name = metadata
        .keys()
        .find(|name| name.eq_ignore_ascii_case("content-type"))
        .cloned();
    let content_type = name.and_then(|name| metadata.remove(&name));
    (content_type, metadata)
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}

fn stat_from_head(key: &str, response: &HeadObjectOutput) -> ObjectStat {
    ObjectStat {
        key: key.to_string(),
        size: response.content_length().unwrap_or(0),
        last_modified: response.last_modified().and_then(to_timestamp),
        etag: response.e_tag().map(str::to_string),
        content_type: response.content_type().map(str::to_string),
        content_encoding: response.content_encoding().map(str::to_string),
        storage_class: response.storage_class().map(|sc| sc.as_str().to_string()),
        user_metadata: response.metadata().cloned().unwrap_or_default(),
    }
}

fn listing_from_output(response: &ListObjectsOutput) -> ListBucketResult {
    let contents: Vec<ObjectStat> = response
        .contents()
        .iter()
        .map(|object| ObjectStat {
            key: object.key().unwrap_or_default().to_string(),
            size: object.size().unwrap_or(0),
            last_modified: object.last_modified().and_then(to_timestamp),
            etag: object.e_tag().map(str::to_string),
            storage_class: object.storage_class().map(|sc| sc.as_str().to_string()),
            ..Default::default()
        })
        .collect();

    let common_prefixes = response
        .common_prefixes()
        .iter()
        .filter_map(|p| p.prefix().map(str::to_string))
        .collect();

    let is_truncated = response.is_truncated().unwrap_or(false);

    // NextMarker is only sent when a delimiter was given
    let next_marker = response.next_marker().map(str::to_string).or_else(|| {
        is_truncated
            .then(|| contents.last().map(|o| o.key.clone()))
            .flatten()
    });

    ListBucketResult {
        contents,
        common_prefixes,
        is_truncated,
        next_marker,
    }
}
