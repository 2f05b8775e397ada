//! Object storage access for the image gallery
mod error;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, Utc};

pub use error::{StorageError, StorageResult};

/// Presigned URL with expiration information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// The presigned URL for GET operations
    pub url: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Operations the gallery needs from an object storage service
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Lists every object key in `bucket`, in the order the service returns them
    async fn list_object_keys(&self, bucket: &str) -> StorageResult<Vec<String>>;

    /// Issues a read-only presigned URL for `key` valid for `expires_in`
    async fn presign_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl>;
}

/// S3-backed object storage
pub struct S3ObjectStorage {
    s3_client: Arc<S3Client>,
}

impl S3ObjectStorage {
    /// Creates a new S3 object storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client, shared for the process lifetime
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    /// Lists the bucket with `ListObjectsV2`, following continuation tokens
    ///
    /// # Errors
    ///
    /// Returns `StorageError::BucketNotFound` if the bucket does not exist
    /// Returns `StorageError::UpstreamError` for 5xx errors
    /// Returns `StorageError::S3Error` or `StorageError::AwsError` for anything else
    async fn list_object_keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
        let mut pages = self
            .s3_client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| StorageError::from_list_error(bucket, e))?;
            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));
        }

        Ok(keys)
    }

    /// Generates a SigV4 presigned URL for GET operations
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if the expiry is outside what S3 accepts
    /// Returns `StorageError::S3Error` if presigned URL generation fails
    async fn presign_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        let presigned_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            StorageError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigned_config)
            .await?;

        Ok(PresignedUrl {
            url: presigned_request.uri().to_string(),
            expires_at: Utc::now() + expires_in,
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::Utc;

    use super::{ObjectStorage, PresignedUrl, StorageError, StorageResult};

    /// In-memory storage double that signs `key` as `https://signed/<key>`
    #[derive(Default)]
    pub struct MockObjectStorage {
        keys: Vec<String>,
        failing_keys: HashSet<String>,
        fail_listing: bool,
        slow_early_keys: bool,
        list_calls: AtomicUsize,
        presign_calls: AtomicUsize,
        requested_expiries: Mutex<Vec<Duration>>,
        signed_keys: Mutex<Vec<String>>,
    }

    impl MockObjectStorage {
        #[must_use]
        pub fn new<I, S>(keys: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                keys: keys.into_iter().map(Into::into).collect(),
                ..Self::default()
            }
        }

        /// Makes signing fail for `key`
        #[must_use]
        pub fn with_failing_key(mut self, key: &str) -> Self {
            self.failing_keys.insert(key.to_string());
            self
        }

        /// Makes the listing call fail
        #[must_use]
        pub fn with_failing_listing(mut self) -> Self {
            self.fail_listing = true;
            self
        }

        /// Delays signing so keys earlier in the listing finish last
        #[must_use]
        pub fn with_slow_early_keys(mut self) -> Self {
            self.slow_early_keys = true;
            self
        }

        #[must_use]
        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        #[must_use]
        pub fn presign_calls(&self) -> usize {
            self.presign_calls.load(Ordering::SeqCst)
        }

        /// Expiries passed to every signing call so far
        ///
        /// # Panics
        ///
        /// Panics if a signing call panicked while holding the lock
        #[must_use]
        pub fn requested_expiries(&self) -> Vec<Duration> {
            self.requested_expiries.lock().unwrap().clone()
        }

        /// Keys in the order their signing calls completed
        ///
        /// # Panics
        ///
        /// Panics if a signing call panicked while holding the lock
        #[must_use]
        pub fn signed_keys(&self) -> Vec<String> {
            self.signed_keys.lock().unwrap().clone()
        }

        fn signing_delay(&self, key: &str) -> Duration {
            let remaining = self
                .keys
                .iter()
                .position(|k| k == key)
                .map_or(0, |index| self.keys.len() - index);
            Duration::from_millis(10 * remaining as u64)
        }
    }

    #[async_trait::async_trait]
    impl ObjectStorage for MockObjectStorage {
        async fn list_object_keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_listing {
                return Err(StorageError::BucketNotFound(bucket.to_string()));
            }
            Ok(self.keys.clone())
        }

        async fn presign_get_url(
            &self,
            _bucket: &str,
            key: &str,
            expires_in: Duration,
        ) -> StorageResult<PresignedUrl> {
            self.presign_calls.fetch_add(1, Ordering::SeqCst);
            self.requested_expiries.lock().unwrap().push(expires_in);

            if self.slow_early_keys {
                tokio::time::sleep(self.signing_delay(key)).await;
            }
            self.signed_keys.lock().unwrap().push(key.to_string());

            if self.failing_keys.contains(key) {
                return Err(StorageError::S3Error(format!("Access denied: {key}")));
            }
            Ok(PresignedUrl {
                url: format!("https://signed/{key}"),
                expires_at: Utc::now() + expires_in,
            })
        }
    }
}
