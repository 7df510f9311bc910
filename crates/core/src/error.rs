//! Error types for anon-core
//!
//! The adapter reports failures through a small, backend-agnostic taxonomy.
//! Backend failures are wrapped with the operation and the bucket/key they
//! were detected on, and the CLI turns every kind into an exit code.

use std::fmt;

use thiserror::Error;

/// Result type alias for anon-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by a [`BackendError`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Adapter operation an error was detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PutObject,
    GetObject,
    GetObjectInfo,
    ListObjects,
    GetBucketInfo,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PutObject => "put object",
            Self::GetObject => "get object",
            Self::GetObjectInfo => "get object info",
            Self::ListObjects => "list objects",
            Self::GetBucketInfo => "get bucket info",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a failure reported by a backend client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The object does not exist
    NoSuchKey,
    /// The bucket does not exist
    NoSuchBucket,
    /// The backend refused the anonymous request
    AccessDenied,
    /// The requested byte range is invalid or not satisfiable
    InvalidRange,
    /// A supplied digest or checksum did not match the uploaded content
    BadDigest,
    /// The request body did not match the declared size
    IncompleteBody,
    /// The stream ended before the requested number of bytes was read
    ShortRead,
    /// Transport failure: timeout, connection reset, dispatch failure
    Network,
    /// The caller's writer rejected the bytes read from the backend
    WriteFailed,
    /// Anything the backend reported that has no better classification
    Other,
}

/// A failure surfaced by a backend client
#[derive(Error, Debug)]
#[error("{message}")]
pub struct BackendError {
    kind: BackendErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Wrap an I/O failure from a body stream
    pub fn from_io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::UnexpectedEof => BackendErrorKind::ShortRead,
            _ => BackendErrorKind::Network,
        };
        Self::new(kind, err.to_string()).with_source(err)
    }

    /// Wrap a failure from the caller's writer
    pub fn from_write(err: std::io::Error) -> Self {
        Self::new(BackendErrorKind::WriteFailed, err.to_string()).with_source(err)
    }

    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error types for anon-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A supplied checksum or digest was not valid hex
    #[error("Invalid checksum for {bucket}/{key}: {source}")]
    InvalidChecksum {
        bucket: String,
        key: String,
        source: hex::FromHexError,
    },

    /// Empty bucket or key on an object operation
    #[error("Invalid argument for {bucket}/{key}: {message}")]
    InvalidArgument {
        bucket: String,
        key: String,
        message: String,
    },

    /// The backend failed while serving the call
    #[error("Failed to {op} {}: {source}", target(.bucket, .key))]
    Backend {
        op: Operation,
        bucket: String,
        key: Option<String>,
        source: BackendError,
    },

    /// The bucket is absent, or vanished between existence check and listing
    #[error("Bucket not found: {bucket}")]
    BucketNotFound { bucket: String },

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn target(bucket: &str, key: &Option<String>) -> String {
    match key {
        Some(key) => format!("{bucket}/{key}"),
        None => bucket.to_string(),
    }
}

impl Error {
    /// Wrap a backend failure with the call site's context
    pub fn backend(
        op: Operation,
        bucket: impl Into<String>,
        key: Option<String>,
        source: BackendError,
    ) -> Self {
        Error::Backend {
            op,
            bucket: bucket.into(),
            key,
            source,
        }
    }

    /// Backend classification, when this is a backend failure
    pub fn backend_kind(&self) -> Option<BackendErrorKind> {
        match self {
            Error::Backend { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Whether this error means the bucket or object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::BucketNotFound { .. } | Error::RemoteNotFound(_)
        ) || matches!(
            self.backend_kind(),
            Some(BackendErrorKind::NoSuchKey | BackendErrorKind::NoSuchBucket)
        )
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidChecksum { .. } | Error::InvalidArgument { .. } => 2, // UsageError
            Error::InvalidPath(_) | Error::Config(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::BucketNotFound { .. } | Error::RemoteNotFound(_) => 5,       // NotFound
            Error::Backend { source, .. } => match source.kind {
                BackendErrorKind::NoSuchKey | BackendErrorKind::NoSuchBucket => 5,
                BackendErrorKind::AccessDenied => 4,
                BackendErrorKind::Network => 3,
                BackendErrorKind::InvalidRange | BackendErrorKind::BadDigest => 2,
                _ => 1,
            },
            _ => 1, // GeneralError
        }
    }
}

/// Attach bucket/key context to backend results
///
/// This is the adapter's error mapper: every backend failure passes through
/// it before leaving the adapter.
pub trait ErrorContext<T> {
    /// Map a failure on an object-scoped call
    fn for_object(self, op: Operation, bucket: &str, key: &str) -> Result<T>;

    /// Map a failure on a bucket-scoped call
    fn for_bucket(self, op: Operation, bucket: &str) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, BackendError> {
    fn for_object(self, op: Operation, bucket: &str, key: &str) -> Result<T> {
        self.map_err(|source| Error::backend(op, bucket, Some(key.to_string()), source))
    }

    fn for_bucket(self, op: Operation, bucket: &str) -> Result<T> {
        self.map_err(|source| Error::backend(op, bucket, None, source))
    }
}
