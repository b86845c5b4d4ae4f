//! Liveness probe.

use axum::Json;

use crate::web::dto::HealthResponse;

/// GET /v1/health - Service liveness.
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
