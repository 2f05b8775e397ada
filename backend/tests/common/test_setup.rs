use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use gallery_backend::{
    assets::AssetLister, object_storage::mock::MockObjectStorage, server, types::Environment,
};
use tempfile::TempDir;
use tower::ServiceExt;

/// Entry document written into the static directory of every test setup
pub const INDEX_HTML: &str = "<!doctype html><title>Gallery</title><canvas id=\"scene\"></canvas>";

/// Setup test logging
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to a mock object storage and a temporary static directory
pub struct TestSetup {
    pub router: Router,
    pub storage: Arc<MockObjectStorage>,
    // Keep the static directory alive for the duration of the test
    _static_dir: TempDir,
}

impl TestSetup {
    pub fn new(storage: MockObjectStorage, bucket_name: Option<&str>) -> Self {
        setup_test_env();

        let environment = Environment::Development {
            presign_expiry_override: None,
        };

        let static_dir = tempfile::tempdir().expect("Failed to create static dir");
        std::fs::write(static_dir.path().join("index.html"), INDEX_HTML)
            .expect("Failed to write index.html");
        std::fs::write(static_dir.path().join("app.js"), "console.log('gallery');")
            .expect("Failed to write app.js");

        let storage = Arc::new(storage);
        let asset_lister = Arc::new(AssetLister::new(
            storage.clone(),
            bucket_name.map(str::to_string),
            Duration::from_secs(environment.presigned_url_expiry_secs()),
        ));

        let router = server::router(environment, asset_lister, static_dir.path());

        Self {
            router,
            storage,
            _static_dir: static_dir,
        }
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
