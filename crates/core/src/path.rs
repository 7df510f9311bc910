//! Path parsing
//!
//! Remote locations are written as `remote/bucket[/key]`.

use crate::error::{Error, Result};
use crate::remote::is_valid_remote_name;

/// A parsed location on a configured remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Remote name
    pub remote: String,
    /// Bucket name
    pub bucket: String,
    /// Object key or prefix (empty for the bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(
        remote: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            remote: remote.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Require a non-empty object key
    pub fn require_key(self) -> Result<Self> {
        if self.key.is_empty() {
            return Err(Error::InvalidPath(format!(
                "'{self}' has no object key. Expected: remote/bucket/key"
            )));
        }
        Ok(self)
    }

    /// Require the path to stop at the bucket
    pub fn require_bucket_only(self) -> Result<Self> {
        if !self.key.is_empty() {
            return Err(Error::InvalidPath(format!(
                "'{self}' names an object. Expected: remote/bucket"
            )));
        }
        Ok(self)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}/{}", self.remote, self.bucket)
        } else {
            write!(f, "{}/{}/{}", self.remote, self.bucket, self.key)
        }
    }
}

/// Parse `remote/bucket[/key]`
///
/// A single trailing slash after the bucket is ignored; the key keeps
/// whatever slashes it was written with.
pub fn parse_path(path: &str) -> Result<RemotePath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let mut parts = path.splitn(3, '/');
    let remote = parts.next().unwrap_or_default();
    let bucket = parts.next().unwrap_or_default();
    let key = parts.next().unwrap_or_default();

    if !is_valid_remote_name(remote) {
        return Err(Error::InvalidPath(format!(
            "Invalid remote name in '{path}'. Expected: remote/bucket[/key]"
        )));
    }

    if bucket.is_empty() {
        return Err(Error::InvalidPath(format!(
            "Path '{path}' has no bucket. Expected: remote/bucket[/key]"
        )));
    }

    Ok(RemotePath::new(remote, bucket, key))
}
