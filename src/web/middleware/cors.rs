//! CORS middleware configuration.

use axum::http::header::{
    ACCEPT_ENCODING, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE,
};
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Create the CORS layer.
///
/// Any origin may call the API. `Content-Disposition` is exposed so browsers
/// can read the download file name.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            CONTENT_LENGTH,
            ACCEPT_ENCODING,
            AUTHORIZATION,
            CONTENT_DISPOSITION,
        ])
        .expose_headers([CONTENT_DISPOSITION])
}
