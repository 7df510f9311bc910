//! anon-core: Core library for the anonymous-access gateway adapter
//!
//! This crate provides:
//! - The backend-agnostic error taxonomy and error mapper
//! - The normalized object, bucket and listing model
//! - The `BackendClient` trait for unauthenticated storage operations
//! - `AnonymousAdapter`, which drives a backend client on behalf of
//!   unauthenticated callers
//! - Configuration, remote management and path parsing
//!
//! This crate is independent of any specific S3 SDK.

pub mod adapter;
pub mod backend;
pub mod config;
pub mod error;
pub mod path;
pub mod remote;
pub mod types;

pub use adapter::AnonymousAdapter;
pub use backend::{
    BackendClient, BoxedReader, BucketEntry, ListBucketResult, ObjectStat, PutObjectInput,
};
pub use config::{Config, ConfigManager};
pub use error::{BackendError, BackendErrorKind, Error, ErrorContext, Operation, Result};
pub use path::{RemotePath, parse_path};
pub use remote::{BucketLookup, Remote, RemoteManager, RetryConfig, TimeoutConfig};
pub use types::{
    BucketInfo, ByteRange, CONTENT_MD5_METADATA_KEY, ListObjectsInfo, ObjectInfo, PutObjectOptions,
};
