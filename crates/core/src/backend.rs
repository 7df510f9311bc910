//! Backend client trait definition
//!
//! The adapter never talks to a storage protocol directly. It drives a
//! [`BackendClient`], which performs unauthenticated requests against the
//! remote store and returns backend-native results. Implementations must be
//! safe to share between concurrent callers.

use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::io::AsyncRead;

use crate::error::BackendError;
use crate::types::ByteRange;

/// Owned byte stream passed to or returned from a backend
pub type BoxedReader = Pin<Box<dyn AsyncRead + Send>>;

/// Backend-native object metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectStat {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<Timestamp>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub storage_class: Option<String>,
    pub user_metadata: HashMap<String, String>,
}

/// Backend-native bucket listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    pub name: String,
    pub creation_date: Timestamp,
}

/// Backend-native object listing page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBucketResult {
    pub contents: Vec<ObjectStat>,
    pub common_prefixes: Vec<String>,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
}

/// Everything a backend needs for an unauthenticated put
pub struct PutObjectInput {
    pub bucket: String,
    pub key: String,
    /// Declared content length, `None` when unknown
    pub size: Option<u64>,
    pub body: BoxedReader,
    /// Raw MD5 digest, empty when not supplied
    pub content_md5: Vec<u8>,
    /// Raw SHA-256 checksum, empty when not supplied
    pub content_sha256: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

/// Unauthenticated operations against a remote object store
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Upload an object from a stream
    async fn put_object(&self, input: PutObjectInput) -> Result<ObjectStat, BackendError>;

    /// Open a stream over exactly `range` of an object
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: ByteRange,
    ) -> Result<BoxedReader, BackendError>;

    /// Fetch object metadata without the body
    async fn stat_object(&self, bucket: &str, key: &str) -> Result<ObjectStat, BackendError>;

    /// List one page of objects
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> Result<ListBucketResult, BackendError>;

    /// Check if a bucket exists
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, BackendError>;

    /// List all buckets visible to an anonymous caller
    async fn list_buckets(&self) -> Result<Vec<BucketEntry>, BackendError>;
}
