//! Last-resort response shaping: panics, unknown routes, wrong methods and
//! `OPTIONS` requests.

use std::any::Any;

use axum::{
    body::Body,
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::web::error::ApiError;

/// Turn a handler panic into the regular 500 error body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::internal("Unexpected server error")
        .with_detail(detail)
        .into_response()
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Replace axum's empty 405 response with the error body.
pub async fn normalize_method_not_allowed(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(axum::http::header::ALLOW).cloned();
    let mut normalized = ApiError::method_not_allowed().into_response();
    if let Some(allow) = allow {
        normalized
            .headers_mut()
            .insert(axum::http::header::ALLOW, allow);
    }
    normalized
}

/// Answer every `OPTIONS` request with `204 No Content`.
///
/// The inner stack still runs, so CORS headers are kept.
pub async fn options_no_content(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let response = next.run(request).await;
    let (mut parts, _body) = response.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(CONTENT_TYPE);
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::empty())
}
