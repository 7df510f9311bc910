//! Anonymous object adapter
//!
//! Translates the gateway's generic storage calls into unauthenticated
//! backend requests and normalizes the results. The adapter holds nothing
//! but a shared backend handle, so one instance can serve any number of
//! concurrent callers.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::backend::{BackendClient, BoxedReader, PutObjectInput};
use crate::error::{BackendError, BackendErrorKind, Error, ErrorContext, Operation, Result};
use crate::types::{BucketInfo, ByteRange, ListObjectsInfo, ObjectInfo, PutObjectOptions};

/// Serves put/get/stat/list/bucket-info without caller credentials
#[derive(Clone)]
pub struct AnonymousAdapter {
    client: Arc<dyn BackendClient>,
}

impl AnonymousAdapter {
    /// Create an adapter over an unauthenticated backend client
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self { client }
    }

    /// Upload an object anonymously
    ///
    /// A negative `size` means the length is unknown. Checksums are decoded
    /// before anything is sent; a malformed one fails the call with
    /// [`Error::InvalidChecksum`] and the backend is never contacted.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        size: i64,
        data: BoxedReader,
        options: PutObjectOptions,
    ) -> Result<ObjectInfo> {
        check_object(bucket, key)?;

        let content_sha256 = decode_checksum(options.content_sha256(), bucket, key)?;
        let content_md5 = decode_checksum(options.content_md5(), bucket, key)?;

        debug!(bucket, key, size, "anonymous put object");

        let input = PutObjectInput {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: u64::try_from(size).ok(),
            body: data,
            content_md5,
            content_sha256,
            metadata: options.into_user_metadata(),
        };

        let stat = self
            .client
            .put_object(input)
            .await
            .for_object(Operation::PutObject, bucket, key)?;

        Ok(ObjectInfo::from_stat(bucket, stat))
    }

    /// Copy exactly `length` bytes starting at `offset` into `writer`
    ///
    /// The backend stream is owned by this call and dropped on every return
    /// path. A stream that ends early fails the call; no attempt is made to
    /// fall back to the whole object.
    pub async fn get_object<W>(
        &self,
        bucket: &str,
        key: &str,
        offset: i64,
        length: i64,
        writer: &mut W,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        check_object(bucket, key)?;

        let range = ByteRange::new(offset, length).for_object(Operation::GetObject, bucket, key)?;

        debug!(bucket, key, range = %range.to_header(), "anonymous get object");

        let reader = self
            .client
            .get_object(bucket, key, range)
            .await
            .for_object(Operation::GetObject, bucket, key)?;

        copy_exact(reader, writer, range.length())
            .await
            .for_object(Operation::GetObject, bucket, key)
    }

    /// Fetch object metadata anonymously
    pub async fn get_object_info(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        check_object(bucket, key)?;

        debug!(bucket, key, "anonymous stat object");

        let stat = self
            .client
            .stat_object(bucket, key)
            .await
            .for_object(Operation::GetObjectInfo, bucket, key)?;

        Ok(ObjectInfo::from_stat(bucket, stat))
    }

    /// List one page of objects anonymously
    ///
    /// All listing parameters reach the backend unmodified and entries are
    /// returned in the order the backend produced them.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        marker: &str,
        delimiter: &str,
        max_keys: i32,
    ) -> Result<ListObjectsInfo> {
        debug!(bucket, prefix, marker, delimiter, max_keys, "anonymous list objects");

        let result = self
            .client
            .list_objects(bucket, prefix, marker, delimiter, max_keys)
            .await
            .for_bucket(Operation::ListObjects, bucket)?;

        Ok(ListObjectsInfo::from_listing(bucket, result))
    }

    /// Fetch bucket metadata anonymously
    ///
    /// The backend has no single stat-bucket call, so existence is checked
    /// first and the creation date is then read from the bucket listing. A
    /// bucket that disappears between the two calls is reported as
    /// [`Error::BucketNotFound`], the same as one that never existed.
    pub async fn get_bucket_info(&self, bucket: &str) -> Result<BucketInfo> {
        debug!(bucket, "anonymous stat bucket");

        let exists = self
            .client
            .bucket_exists(bucket)
            .await
            .for_bucket(Operation::GetBucketInfo, bucket)?;
        if !exists {
            return Err(Error::BucketNotFound {
                bucket: bucket.to_string(),
            });
        }

        let buckets = self
            .client
            .list_buckets()
            .await
            .for_bucket(Operation::GetBucketInfo, bucket)?;

        match buckets.into_iter().find(|entry| entry.name == bucket) {
            Some(entry) => Ok(BucketInfo::from(entry)),
            None => {
                warn!(bucket, "bucket exists but is missing from the bucket listing");
                Err(Error::BucketNotFound {
                    bucket: bucket.to_string(),
                })
            }
        }
    }
}

fn check_object(bucket: &str, key: &str) -> Result<()> {
    let message = if bucket.is_empty() {
        "bucket name cannot be empty"
    } else if key.is_empty() {
        "object key cannot be empty"
    } else {
        return Ok(());
    };

    Err(Error::InvalidArgument {
        bucket: bucket.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    })
}

fn decode_checksum(value: Option<&str>, bucket: &str, key: &str) -> Result<Vec<u8>> {
    match value {
        Some(hex_value) => hex::decode(hex_value).map_err(|source| Error::InvalidChecksum {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

/// Read buffer size for ranged copies
const COPY_BUF_SIZE: u64 = 64 * 1024;

/// Copy `length` bytes, keeping stream failures apart from writer failures
async fn copy_exact<W>(
    reader: BoxedReader,
    writer: &mut W,
    length: u64,
) -> std::result::Result<(), BackendError>
where
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let mut limited = reader.take(length);
    let mut buf = vec![0u8; length.min(COPY_BUF_SIZE) as usize];
    let mut copied: u64 = 0;

    loop {
        let n = limited.read(&mut buf).await.map_err(BackendError::from_io)?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buf[..n])
            .await
            .map_err(BackendError::from_write)?;
        copied += n as u64;
    }
    writer.flush().await.map_err(BackendError::from_write)?;

    if copied < length {
        return Err(BackendError::new(
            BackendErrorKind::ShortRead,
            format!("stream ended after {copied} of {length} bytes"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};

    use jiff::Timestamp;
    use tokio::io::{AsyncRead, ReadBuf};

    use super::*;
    use crate::backend::{BucketEntry, ListBucketResult, MockBackendClient, ObjectStat};

    /// In-memory stream that counts how many times it is dropped
    struct TrackedReader {
        data: io::Cursor<Vec<u8>>,
        fail_after: Option<usize>,
        drops: Arc<AtomicUsize>,
    }

    impl TrackedReader {
        fn boxed(data: &[u8], drops: &Arc<AtomicUsize>) -> BoxedReader {
            Box::pin(Self {
                data: io::Cursor::new(data.to_vec()),
                fail_after: None,
                drops: Arc::clone(drops),
            })
        }

        fn failing(data: &[u8], drops: &Arc<AtomicUsize>) -> BoxedReader {
            Box::pin(Self {
                data: io::Cursor::new(data.to_vec()),
                fail_after: Some(data.len()),
                drops: Arc::clone(drops),
            })
        }
    }

    impl AsyncRead for TrackedReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let exhausted = self.data.position() as usize >= self.data.get_ref().len();
            if exhausted && self.fail_after.is_some() {
                return Poll::Ready(Err(io::Error::from(io::ErrorKind::ConnectionReset)));
            }
            Pin::new(&mut self.data).poll_read(cx, buf)
        }
    }

    impl Drop for TrackedReader {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn adapter(mock: MockBackendClient) -> AnonymousAdapter {
        AnonymousAdapter::new(Arc::new(mock))
    }

    fn body(data: &'static [u8]) -> BoxedReader {
        Box::pin(data)
    }

    fn ts(seconds: i64) -> Timestamp {
        Timestamp::from_second(seconds).unwrap()
    }

    #[tokio::test]
    async fn test_put_object_decodes_digest_and_strips_reserved_key() {
        let mut mock = MockBackendClient::new();
        mock.expect_put_object()
            .withf(|input| {
                input.bucket == "b"
                    && input.key == "k"
                    && input.size == Some(5)
                    && input.content_md5 == hex::decode("5d41402abc4b2a76b9719d911017c592").unwrap()
                    && input.content_sha256.is_empty()
                    && input.metadata.is_empty()
            })
            .times(1)
            .returning(|input| {
                Ok(ObjectStat {
                    key: input.key,
                    size: 5,
                    etag: Some("\"5d41402abc4b2a76b9719d911017c592\"".into()),
                    ..Default::default()
                })
            });

        let metadata = HashMap::from([(
            "md5Sum".to_string(),
            "5d41402abc4b2a76b9719d911017c592".to_string(),
        )]);
        let info = adapter(mock)
            .put_object(
                "b",
                "k",
                5,
                body(b"hello"),
                PutObjectOptions::from_metadata(metadata, ""),
            )
            .await
            .unwrap();

        assert_eq!(info.name, "k");
        assert_eq!(info.bucket, "b");
        assert_eq!(info.size, 5);
        assert_eq!(
            info.etag.as_deref(),
            Some("5d41402abc4b2a76b9719d911017c592")
        );
    }

    #[tokio::test]
    async fn test_put_object_never_forwards_md5_metadata() {
        // (md5Sum value, digest the backend must receive; None when rejected)
        let cases: [(&str, Option<Vec<u8>>); 4] = [
            ("", Some(Vec::new())),
            ("00", Some(vec![0])),
            (
                "5d41402abc4b2a76b9719d911017c592",
                Some(hex::decode("5d41402abc4b2a76b9719d911017c592").unwrap()),
            ),
            ("zz", None),
        ];

        for (value, expected_md5) in cases {
            let mut mock = MockBackendClient::new();
            match expected_md5.clone() {
                Some(md5) => {
                    mock.expect_put_object()
                        .withf(move |input| {
                            !input.metadata.contains_key("md5Sum")
                                && input.metadata.get("owner").map(String::as_str) == Some("ops")
                                && input.content_md5 == md5
                        })
                        .times(1)
                        .returning(|input| {
                            Ok(ObjectStat {
                                key: input.key,
                                ..Default::default()
                            })
                        });
                }
                None => {
                    mock.expect_put_object().never();
                }
            }

            let options = PutObjectOptions::new()
                .with_metadata("md5Sum", value)
                .with_metadata("owner", "ops");
            let result = adapter(mock)
                .put_object("b", "k", -1, body(b""), options)
                .await;

            match expected_md5 {
                Some(_) => assert!(result.is_ok(), "md5Sum {value:?}: {result:?}"),
                None => assert!(
                    matches!(result, Err(Error::InvalidChecksum { .. })),
                    "md5Sum {value:?}: {result:?}"
                ),
            }
        }
    }

    #[tokio::test]
    async fn test_put_object_forwards_checksum_and_metadata() {
        let sha = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        let mut mock = MockBackendClient::new();
        mock.expect_put_object()
            .withf(move |input| {
                input.size.is_none()
                    && hex::encode(&input.content_sha256) == sha
                    && input.content_md5.is_empty()
                    && input.metadata.get("owner").map(String::as_str) == Some("ops")
            })
            .times(1)
            .returning(|input| {
                Ok(ObjectStat {
                    key: input.key,
                    size: 5,
                    ..Default::default()
                })
            });

        let options = PutObjectOptions::new()
            .with_content_sha256(sha)
            .with_metadata("owner", "ops");
        let info = adapter(mock)
            .put_object("b", "k", -1, body(b"hello"), options)
            .await
            .unwrap();
        assert_eq!(info.size, 5);
    }

    #[tokio::test]
    async fn test_put_object_invalid_checksum_skips_backend() {
        let cases = [
            PutObjectOptions::new().with_content_sha256("zz"),
            PutObjectOptions::new().with_content_md5("abc"),
            PutObjectOptions::from_metadata(
                HashMap::from([("md5Sum".to_string(), "xyz!".to_string())]),
                "",
            ),
        ];

        for options in cases {
            let mut mock = MockBackendClient::new();
            mock.expect_put_object().never();

            let err = adapter(mock)
                .put_object("b", "k", 5, body(b"hello"), options)
                .await
                .unwrap_err();
            match err {
                Error::InvalidChecksum { bucket, key, .. } => {
                    assert_eq!(bucket, "b");
                    assert_eq!(key, "k");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_checksum_hex_round_trip() {
        for value in ["", "00", "5d41402abc4b2a76b9719d911017c592", "deadBEEF"] {
            let decoded = decode_checksum(Some(value), "b", "k").unwrap();
            assert_eq!(hex::encode(decoded), value.to_ascii_lowercase());
        }
        assert!(decode_checksum(None, "b", "k").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_object_maps_backend_failure() {
        let mut mock = MockBackendClient::new();
        mock.expect_put_object().returning(|_| {
            Err(BackendError::new(BackendErrorKind::AccessDenied, "Access Denied"))
        });

        let err = adapter(mock)
            .put_object("b", "k", 5, body(b"hello"), PutObjectOptions::new())
            .await
            .unwrap_err();
        match err {
            Error::Backend {
                op,
                bucket,
                key,
                source,
            } => {
                assert_eq!(op, Operation::PutObject);
                assert_eq!(bucket, "b");
                assert_eq!(key.as_deref(), Some("k"));
                assert_eq!(source.kind(), BackendErrorKind::AccessDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_before_backend() {
        let mock = MockBackendClient::new();
        let adapter = adapter(mock);

        let err = adapter.get_object_info("b", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = adapter
            .put_object("", "k", 0, body(b""), PutObjectOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_get_object_copies_exact_length_and_drops_stream_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let stream_drops = Arc::clone(&drops);

        let mut mock = MockBackendClient::new();
        mock.expect_get_object()
            .withf(|bucket, key, range| {
                bucket == "b" && key == "k" && range.offset() == 0 && range.length() == 4
            })
            .times(1)
            .returning(move |_, _, _| Ok(TrackedReader::boxed(b"0123456789", &stream_drops)));

        let mut sink = Vec::new();
        adapter(mock)
            .get_object("b", "k", 0, 4, &mut sink)
            .await
            .unwrap();

        assert_eq!(sink, b"0123");
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_object_short_read_is_backend_error() {
        let drops = Arc::new(AtomicUsize::new(0));
        let stream_drops = Arc::clone(&drops);

        // 8-byte object, range 10..=14: the backend hands back nothing usable
        let mut mock = MockBackendClient::new();
        mock.expect_get_object()
            .withf(|_, _, range| range.to_header() == "bytes=10-14")
            .returning(move |_, _, _| Ok(TrackedReader::boxed(b"", &stream_drops)));

        let mut sink = Vec::new();
        let err = adapter(mock)
            .get_object("b", "k", 10, 5, &mut sink)
            .await
            .unwrap_err();

        match &err {
            Error::Backend {
                op, bucket, key, ..
            } => {
                assert_eq!(*op, Operation::GetObject);
                assert_eq!(bucket, "b");
                assert_eq!(key.as_deref(), Some("k"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.backend_kind(), Some(BackendErrorKind::ShortRead));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_object_stream_failure_drops_stream_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let stream_drops = Arc::clone(&drops);

        let mut mock = MockBackendClient::new();
        mock.expect_get_object()
            .returning(move |_, _, _| Ok(TrackedReader::failing(b"abc", &stream_drops)));

        let mut sink = Vec::new();
        let err = adapter(mock)
            .get_object("b", "k", 0, 10, &mut sink)
            .await
            .unwrap_err();

        assert_eq!(err.backend_kind(), Some(BackendErrorKind::Network));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    /// Writer that rejects every write
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("No space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_get_object_writer_failure_is_not_network() {
        let drops = Arc::new(AtomicUsize::new(0));
        let stream_drops = Arc::clone(&drops);

        let mut mock = MockBackendClient::new();
        mock.expect_get_object()
            .times(1)
            .returning(move |_, _, _| Ok(TrackedReader::boxed(b"0123456789", &stream_drops)));

        let mut sink = FullDisk;
        let err = adapter(mock)
            .get_object("b", "k", 0, 10, &mut sink)
            .await
            .unwrap_err();

        assert_eq!(err.backend_kind(), Some(BackendErrorKind::WriteFailed));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("No space left on device"));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_object_invalid_range_skips_backend() {
        let mut mock = MockBackendClient::new();
        mock.expect_get_object().never();
        let adapter = adapter(mock);

        let mut sink = Vec::new();
        for (offset, length) in [(-1, 4), (0, 0), (0, -5)] {
            let err = adapter
                .get_object("b", "k", offset, length, &mut sink)
                .await
                .unwrap_err();
            assert_eq!(err.backend_kind(), Some(BackendErrorKind::InvalidRange));
        }
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_get_object_open_failure_is_mapped() {
        let mut mock = MockBackendClient::new();
        mock.expect_get_object().returning(|_, _, _| {
            Err(BackendError::new(BackendErrorKind::NoSuchKey, "NoSuchKey"))
        });

        let mut sink = Vec::new();
        let err = adapter(mock)
            .get_object("b", "missing", 0, 1, &mut sink)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Failed to get object b/missing: NoSuchKey");
    }

    #[tokio::test]
    async fn test_get_object_info() {
        let mut mock = MockBackendClient::new();
        mock.expect_stat_object()
            .withf(|bucket, key| bucket == "b" && key == "dir/file.txt")
            .times(1)
            .returning(|_, key| {
                Ok(ObjectStat {
                    key: key.to_string(),
                    size: 42,
                    last_modified: Some(ts(1_700_000_000)),
                    content_type: Some("text/plain".into()),
                    user_metadata: HashMap::from([("owner".into(), "ops".into())]),
                    ..Default::default()
                })
            });

        let info = adapter(mock)
            .get_object_info("b", "dir/file.txt")
            .await
            .unwrap();
        assert_eq!(info.name, "dir/file.txt");
        assert_eq!(info.size, 42);
        assert_eq!(info.mod_time, Some(ts(1_700_000_000)));
        assert_eq!(info.content_type.as_deref(), Some("text/plain"));
        assert_eq!(info.user_defined.get("owner").map(String::as_str), Some("ops"));
    }

    #[tokio::test]
    async fn test_list_objects_forwards_parameters_and_keeps_order() {
        let mut mock = MockBackendClient::new();
        mock.expect_list_objects()
            .withf(|bucket, prefix, marker, delimiter, max_keys| {
                bucket == "b"
                    && prefix == "logs/"
                    && marker == "logs/2024"
                    && delimiter == "/"
                    && *max_keys == 2
            })
            .times(1)
            .returning(|_, _, _, _, _| {
                Ok(ListBucketResult {
                    contents: vec![
                        ObjectStat {
                            key: "logs/b".into(),
                            ..Default::default()
                        },
                        ObjectStat {
                            key: "logs/a".into(),
                            ..Default::default()
                        },
                    ],
                    common_prefixes: vec!["logs/2025/".into()],
                    is_truncated: true,
                    next_marker: Some("logs/a".into()),
                })
            });

        let info = adapter(mock)
            .list_objects("b", "logs/", "logs/2024", "/", 2)
            .await
            .unwrap();

        let names: Vec<_> = info.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["logs/b", "logs/a"]);
        assert_eq!(info.prefixes, ["logs/2025/"]);
        assert!(info.is_truncated);
        assert_eq!(info.next_marker.as_deref(), Some("logs/a"));
    }

    #[tokio::test]
    async fn test_list_objects_error_has_bucket_context_only() {
        let mut mock = MockBackendClient::new();
        mock.expect_list_objects().returning(|_, _, _, _, _| {
            Err(BackendError::new(BackendErrorKind::NoSuchBucket, "NoSuchBucket"))
        });

        let err = adapter(mock)
            .list_objects("b", "", "", "", 1000)
            .await
            .unwrap_err();
        match err {
            Error::Backend {
                op, bucket, key, ..
            } => {
                assert_eq!(op, Operation::ListObjects);
                assert_eq!(bucket, "b");
                assert!(key.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bucket_info_missing_bucket_skips_listing() {
        let mut mock = MockBackendClient::new();
        mock.expect_bucket_exists()
            .withf(|bucket| bucket == "missing")
            .times(1)
            .returning(|_| Ok(false));
        mock.expect_list_buckets().never();

        let err = adapter(mock).get_bucket_info("missing").await.unwrap_err();
        match err {
            Error::BucketNotFound { bucket } => assert_eq!(bucket, "missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bucket_info_picks_matching_entry() {
        let mut mock = MockBackendClient::new();
        mock.expect_bucket_exists().returning(|_| Ok(true));
        mock.expect_list_buckets().times(1).returning(|| {
            Ok(vec![
                BucketEntry {
                    name: "other".into(),
                    creation_date: ts(100),
                },
                BucketEntry {
                    name: "photos".into(),
                    creation_date: ts(200),
                },
                BucketEntry {
                    name: "photos-archive".into(),
                    creation_date: ts(300),
                },
            ])
        });

        let info = adapter(mock).get_bucket_info("photos").await.unwrap();
        assert_eq!(info.name, "photos");
        assert_eq!(info.created, ts(200));
    }

    #[tokio::test]
    async fn test_bucket_info_vanished_between_calls() {
        let mut mock = MockBackendClient::new();
        mock.expect_bucket_exists().returning(|_| Ok(true));
        mock.expect_list_buckets().returning(|| {
            Ok(vec![BucketEntry {
                name: "other".into(),
                creation_date: ts(100),
            }])
        });

        let err = adapter(mock).get_bucket_info("photos").await.unwrap_err();
        assert!(matches!(err, Error::BucketNotFound { ref bucket } if bucket == "photos"));
    }

    #[tokio::test]
    async fn test_bucket_info_backend_failures_are_mapped() {
        let mut mock = MockBackendClient::new();
        mock.expect_bucket_exists().returning(|_| {
            Err(BackendError::new(BackendErrorKind::Network, "timed out"))
        });
        mock.expect_list_buckets().never();

        let err = adapter(mock).get_bucket_info("b").await.unwrap_err();
        assert_eq!(err.backend_kind(), Some(BackendErrorKind::Network));

        let mut mock = MockBackendClient::new();
        mock.expect_bucket_exists().returning(|_| Ok(true));
        mock.expect_list_buckets().returning(|| {
            Err(BackendError::new(BackendErrorKind::AccessDenied, "Access Denied"))
        });

        let err = adapter(mock).get_bucket_info("b").await.unwrap_err();
        assert_eq!(err.backend_kind(), Some(BackendErrorKind::AccessDenied));
        assert!(!err.is_not_found());
    }
}
