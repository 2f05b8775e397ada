/// Health check endpoint
///
/// Always answers `200 OK` with a plain-text body.
#[allow(clippy::unused_async)]
pub async fn handler() -> &'static str {
    "OK"
}
