mod docs;
pub mod health;
pub mod images;
pub mod web;

use aide::axum::{routing::get, ApiRouter};

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .route("/health", axum::routing::get(health::handler))
        .api_route("/api/images", get(images::list_images))
}
