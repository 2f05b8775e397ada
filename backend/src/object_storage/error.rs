//! Error types for object storage operations

use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::{get_object::GetObjectError, list_objects_v2::ListObjectsV2Error},
};
use thiserror::Error;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to the object storage service
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (dispatch, timeout, credentials)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Bucket does not exist
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl StorageError {
    /// Maps a failed `ListObjectsV2` call on `bucket`
    #[must_use]
    pub fn from_list_error(bucket: &str, error: SdkError<ListObjectsV2Error>) -> Self {
        match error {
            SdkError::ServiceError(err) => match err.err() {
                ListObjectsV2Error::NoSuchBucket(_) => Self::BucketNotFound(bucket.to_string()),
                _ if err.raw().status().as_u16() >= 500 => {
                    Self::UpstreamError(DisplayErrorContext(err.err()).to_string())
                }
                _ => Self::S3Error(DisplayErrorContext(err.err()).to_string()),
            },
            _ => Self::AwsError(DisplayErrorContext(&error).to_string()),
        }
    }
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        Self::S3Error(format!(
            "Failed to generate presigned URL: {}",
            DisplayErrorContext(&error)
        ))
    }
}
