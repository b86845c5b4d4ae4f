//! Router configuration for Web API.

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::handlers::{download_file, health, list_files, login, me, register, upload_file, AppState};
use super::middleware::{
    create_cors_layer, handle_panic, normalize_method_not_allowed, options_no_content,
    require_auth, route_not_found,
};
use super::openapi::swagger_ui;
use crate::config::Config;

/// Create the main API router.
///
/// Routes live under `{basePath}/v1`. Swagger UI is mounted at
/// `{basePath}{openapiBasePath}`.
pub fn create_router(app_state: Arc<AppState>, config: &Config) -> Router {
    // No authentication required
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/users", post(register))
        .route("/files/:identifier", get(download_file));

    // Authentication required
    let protected_routes = Router::new()
        .route("/users/me", get(me))
        .route("/files", post(upload_file).get(list_files))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes);

    let app_name = config.logs.app_name.clone();
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<Body>| {
            tracing::info_span!(
                "request",
                app = %app_name,
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .nest(&format!("{}/v1", config.server.base_path), api_routes)
        .merge(swagger_ui(&config.server))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(app_state.max_upload_size))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(middleware::from_fn(options_no_content))
                .layer(create_cors_layer())
                .layer(middleware::from_fn(normalize_method_not_allowed))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(app_state)
}
