//! Image Gallery backend service
//!
//! Serves the static web client and lists bucket images with presigned read URLs.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// Image listing with presigned URLs
pub mod assets;

/// Object storage access
pub mod object_storage;

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Configuration and error types
pub mod types;
