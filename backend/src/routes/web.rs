//! Static web client

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Entry document served for every path that is not a file in the static directory
pub const ENTRY_DOCUMENT: &str = "index.html";

/// Serves files from `static_dir`, falling back to its entry document
pub fn service(static_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join(ENTRY_DOCUMENT)))
}
