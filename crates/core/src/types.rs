//! Normalized, backend-neutral data model
//!
//! These are the shapes the adapter hands back to the gateway. They are
//! built per call by copying fields out of the backend-native results in
//! [`crate::backend`] and are never cached.

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::backend::{BucketEntry, ListBucketResult, ObjectStat};
use crate::error::{BackendError, BackendErrorKind};

/// Reserved metadata key that carries the hex MD5 digest of an upload
pub const CONTENT_MD5_METADATA_KEY: &str = "md5Sum";

/// Metadata for an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Bucket the object lives in
    pub bucket: String,

    /// Object key
    pub name: String,

    /// Size in bytes
    pub size: i64,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_time: Option<Timestamp>,

    /// ETag without surrounding quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Content encoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Whether this entry is a common prefix rather than an object
    pub is_dir: bool,

    /// User-defined metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub user_defined: HashMap<String, String>,
}

impl ObjectInfo {
    /// Normalize a backend object result for `bucket`
    pub fn from_stat(bucket: &str, stat: ObjectStat) -> Self {
        Self {
            bucket: bucket.to_string(),
            is_dir: stat.key.ends_with('/'),
            name: stat.key,
            size: stat.size,
            mod_time: stat.last_modified,
            etag: stat.etag.map(|etag| etag.trim_matches('"').to_string()),
            content_type: stat.content_type,
            content_encoding: stat.content_encoding,
            storage_class: stat.storage_class,
            user_defined: stat.user_metadata,
        }
    }
}

/// Metadata for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,
    pub created: Timestamp,
}

impl From<BucketEntry> for BucketInfo {
    fn from(entry: BucketEntry) -> Self {
        Self {
            name: entry.name,
            created: entry.creation_date,
        }
    }
}

/// Result of a list objects call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListObjectsInfo {
    /// Whether more entries are available
    pub is_truncated: bool,

    /// Marker to resume listing from when truncated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,

    /// Objects in backend order
    pub objects: Vec<ObjectInfo>,

    /// Common prefixes in backend order
    pub prefixes: Vec<String>,
}

impl ListObjectsInfo {
    /// Normalize a backend listing for `bucket`
    pub fn from_listing(bucket: &str, result: ListBucketResult) -> Self {
        Self {
            is_truncated: result.is_truncated,
            next_marker: result.next_marker,
            objects: result
                .contents
                .into_iter()
                .map(|stat| ObjectInfo::from_stat(bucket, stat))
                .collect(),
            prefixes: result.common_prefixes,
        }
    }
}

/// Inclusive byte span `[offset, offset + length - 1]` of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    offset: u64,
    length: u64,
}

impl ByteRange {
    /// Build a range from a signed offset and length
    ///
    /// Fails unless `offset >= 0`, `length > 0` and the last byte offset
    /// fits in an `i64`.
    pub fn new(offset: i64, length: i64) -> Result<Self, BackendError> {
        if offset < 0 {
            return Err(BackendError::new(
                BackendErrorKind::InvalidRange,
                format!("negative range offset {offset}"),
            ));
        }
        if length <= 0 {
            return Err(BackendError::new(
                BackendErrorKind::InvalidRange,
                format!("range length must be positive, got {length}"),
            ));
        }
        if offset.checked_add(length - 1).is_none() {
            return Err(BackendError::new(
                BackendErrorKind::InvalidRange,
                format!("range {offset}+{length} overflows"),
            ));
        }

        Ok(Self {
            offset: offset as u64,
            length: length as u64,
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Offset of the last byte in the range
    pub fn end(&self) -> u64 {
        self.offset + self.length - 1
    }

    /// Value for an HTTP `Range` header
    pub fn to_header(&self) -> String {
        format!("bytes={}-{}", self.offset, self.end())
    }
}

/// Options for an anonymous put
///
/// User metadata, the MD5 content digest and the SHA-256 content checksum
/// are kept apart. The reserved `md5Sum` key is never stored as user
/// metadata: it is routed into the digest wherever it is supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectOptions {
    user_metadata: HashMap<String, String>,
    content_md5: Option<String>,
    content_sha256: Option<String>,
}

impl PutObjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a single metadata mapping that may carry the
    /// reserved `md5Sum` entry, plus a hex SHA-256 string
    pub fn from_metadata(metadata: HashMap<String, String>, sha256sum: &str) -> Self {
        let mut options = Self::new().with_content_sha256(sha256sum);
        for (name, value) in metadata {
            options = options.with_metadata(name, value);
        }
        options
    }

    /// Add a user metadata entry
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == CONTENT_MD5_METADATA_KEY {
            self.content_md5 = Some(value);
        } else {
            self.user_metadata.insert(name, value);
        }
        self
    }

    /// Set the hex-encoded MD5 digest of the content
    pub fn with_content_md5(mut self, md5_hex: impl Into<String>) -> Self {
        self.content_md5 = Some(md5_hex.into());
        self
    }

    /// Set the hex-encoded SHA-256 checksum of the content
    pub fn with_content_sha256(mut self, sha256_hex: impl Into<String>) -> Self {
        self.content_sha256 = Some(sha256_hex.into());
        self
    }

    pub fn user_metadata(&self) -> &HashMap<String, String> {
        &self.user_metadata
    }

    pub fn content_md5(&self) -> Option<&str> {
        self.content_md5.as_deref().filter(|s| !s.is_empty())
    }

    pub fn content_sha256(&self) -> Option<&str> {
        self.content_sha256.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn into_user_metadata(self) -> HashMap<String, String> {
        self.user_metadata
    }
}
