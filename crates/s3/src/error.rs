//! Classification of AWS SDK failures
//!
//! Turns `SdkError`s into [`BackendError`]s so the adapter can map them onto
//! its taxonomy without knowing anything about the SDK.

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use anon_core::{BackendError, BackendErrorKind};

/// Convert an SDK failure into a backend error, keeping the SDK error as the cause
pub(crate) fn classify<E>(err: SdkError<E, HttpResponse>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let (kind, message) = match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => (
            BackendErrorKind::Network,
            DisplayErrorContext(&err).to_string(),
        ),
        SdkError::ServiceError(context) => {
            let code = context.err().code();
            let status = context.raw().status().as_u16();
            let message = match (code, context.err().message()) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (Some(code), None) => code.to_string(),
                (None, _) => format!("HTTP {status}"),
            };
            (kind_for(code, status), message)
        }
        _ => (
            BackendErrorKind::Other,
            DisplayErrorContext(&err).to_string(),
        ),
    };

    BackendError::new(kind, message).with_source(err)
}

/// Pick a kind from the S3 error code, falling back to the HTTP status
pub(crate) fn kind_for(code: Option<&str>, status: u16) -> BackendErrorKind {
    match code {
        Some("NoSuchKey") => BackendErrorKind::NoSuchKey,
        Some("NoSuchBucket") => BackendErrorKind::NoSuchBucket,
        Some("AccessDenied" | "AllAccessDisabled" | "AccountProblem") => {
            BackendErrorKind::AccessDenied
        }
        Some("InvalidRange") => BackendErrorKind::InvalidRange,
        Some("BadDigest" | "InvalidDigest" | "XAmzContentSHA256Mismatch") => {
            BackendErrorKind::BadDigest
        }
        Some("IncompleteBody") => BackendErrorKind::IncompleteBody,
        Some("RequestTimeout" | "SlowDown" | "ServiceUnavailable") => BackendErrorKind::Network,
        _ => match status {
            404 => BackendErrorKind::NoSuchKey,
            403 => BackendErrorKind::AccessDenied,
            416 => BackendErrorKind::InvalidRange,
            503 => BackendErrorKind::Network,
            _ => BackendErrorKind::Other,
        },
    }
}
