//! anon-s3: unauthenticated S3 backend for the anonymous gateway adapter
//!
//! This crate implements the `BackendClient` trait from anon-core on top of
//! aws-sdk-s3. It is the only crate that directly depends on the AWS SDK.

pub mod client;
mod error;

pub use client::AnonymousS3Client;
