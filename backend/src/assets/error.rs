//! Error types for asset listing

use thiserror::Error;

use crate::object_storage::StorageError;

/// Result type for asset listing
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors that can occur while listing assets
#[derive(Error, Debug)]
pub enum AssetError {
    /// Required configuration is missing; no storage call was made
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Listing or signing failed in the storage service
    #[error(transparent)]
    Storage(#[from] StorageError),
}
