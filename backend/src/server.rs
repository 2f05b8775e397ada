use std::path::Path;
use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{http::StatusCode, Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;

use crate::routes::{self, web};
use crate::{assets::AssetLister, types::Environment};

/// Builds the application router with its dependencies attached
///
/// API routes are matched first; every other path is served from `static_dir`.
pub fn router(
    environment: Environment,
    asset_lister: Arc<AssetLister>,
    static_dir: &Path,
) -> Router {
    let mut openapi = OpenApi::default();

    routes::handler()
        .finish_api(&mut openapi)
        .fallback_service(web::service(static_dir))
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(asset_lister))
}

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(environment: Environment, asset_lister: Arc<AssetLister>) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], environment.port()?));

    let static_dir = environment.static_dir();
    tracing::info!("Serving web client from {}", static_dir.display());

    let router = router(environment, asset_lister, &static_dir)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
        .layer(tower_http::timeout::TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(30),
        ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Image Gallery started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
