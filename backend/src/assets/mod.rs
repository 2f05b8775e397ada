//! Image asset listing with presigned read URLs
mod error;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::object_storage::ObjectStorage;

pub use error::{AssetError, AssetResult};

/// File suffixes treated as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// An image in the bucket together with a time-limited read URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Asset {
    /// Object key in the bucket
    pub name: String,
    /// Presigned GET URL for the object
    pub url: String,
}

/// Returns true if `key` ends in one of [`IMAGE_EXTENSIONS`]
#[must_use]
pub fn is_image_key(key: &str) -> bool {
    key.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|image_ext| ext.eq_ignore_ascii_case(image_ext))
    })
}

/// Lists the images of one bucket and signs a read URL for each
pub struct AssetLister {
    storage: Arc<dyn ObjectStorage>,
    bucket_name: Option<String>,
    url_expiry: Duration,
}

impl AssetLister {
    /// Creates a new asset lister
    ///
    /// # Arguments
    ///
    /// * `storage` - Object storage used for listing and signing
    /// * `bucket_name` - Bucket to list; `None` or blank makes every listing fail
    /// * `url_expiry` - Lifetime of each issued URL
    #[must_use]
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        bucket_name: Option<String>,
        url_expiry: Duration,
    ) -> Self {
        Self {
            storage,
            bucket_name,
            url_expiry,
        }
    }

    /// Lists all image objects of the bucket with a presigned URL each
    ///
    /// The result keeps the order of the storage listing. URLs are requested
    /// concurrently and all of them must succeed.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::Configuration` if no bucket is configured; storage is not called
    /// Returns `AssetError::Storage` if the listing or any URL signing fails
    #[instrument(skip(self), fields(bucket = ?self.bucket_name))]
    pub async fn list_assets(&self) -> AssetResult<Vec<Asset>> {
        let bucket = self
            .bucket_name
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                AssetError::Configuration("S3_BUCKET_NAME environment variable not set".to_string())
            })?;

        let keys = self.storage.list_object_keys(bucket).await?;
        let total = keys.len();

        let image_keys: Vec<String> = keys.into_iter().filter(|k| is_image_key(k)).collect();

        tracing::info!("Listed {total} objects, {} images", image_keys.len());

        let presign_requests = image_keys
            .iter()
            .map(|key| self.storage.presign_get_url(bucket, key, self.url_expiry));

        let results = join_all(presign_requests).await;

        image_keys
            .into_iter()
            .zip(results)
            .map(|(name, result)| -> AssetResult<Asset> {
                let presigned = result?;
                tracing::debug!("Signed {name}, expires at {}", presigned.expires_at);
                Ok(Asset {
                    name,
                    url: presigned.url,
                })
            })
            .collect()
    }
}
