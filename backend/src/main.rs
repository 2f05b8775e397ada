use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::Client as S3Client;

use gallery_backend::{
    assets::AssetLister, object_storage::S3ObjectStorage, server, types::Environment,
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON logs for staging/production (Datadog), plain text for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    tracing::info!("Starting Image Gallery in {:?} environment", environment);

    let bucket_name = environment.s3_bucket();
    if bucket_name.is_none() {
        tracing::warn!("S3_BUCKET_NAME is not set, /api/images will fail until it is configured");
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let asset_lister = Arc::new(AssetLister::new(
        Arc::new(S3ObjectStorage::new(s3_client)),
        bucket_name,
        Duration::from_secs(environment.presigned_url_expiry_secs()),
    ));

    server::start(environment, asset_lister).await
}
