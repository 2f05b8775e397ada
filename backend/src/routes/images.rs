use std::sync::Arc;

use axum::{Extension, Json};
use tracing::instrument;

use crate::{
    assets::{Asset, AssetLister},
    types::AppError,
};

/// Lists the gallery images with time-limited read URLs
///
/// Every image object in the configured bucket (`jpg`, `jpeg`, `png`, `gif`,
/// `webp`, any case) is returned in bucket listing order with a presigned
/// GET URL.
///
/// # Errors
///
/// Returns `500 INTERNAL_SERVER_ERROR` with `{ "error": message }` if the
/// bucket is not configured, the listing fails, or any URL cannot be signed.
#[instrument(skip(asset_lister))]
pub async fn list_images(
    Extension(asset_lister): Extension<Arc<AssetLister>>,
) -> Result<Json<Vec<Asset>>, AppError> {
    let assets = asset_lister.list_assets().await?;

    Ok(Json(assets))
}
