//! User handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::db::UserPublic;
use crate::web::dto::{CredentialsRequest, ValidatedJson};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /v1/users - Register a user.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created", body = UserPublic),
        (status = 400, description = "Malformed body or username taken", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    let user = state.users.register(&req.username, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /v1/users/me - Current user.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserPublic),
        (status = 401, description = "Token missing or expired", body = ErrorBody),
        (status = 403, description = "Invalid token", body = ErrorBody),
        (status = 404, description = "User no longer exists", body = ErrorBody)
    ),
    security(
        ("User" = [])
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<UserPublic>, ApiError> {
    let user = state.users.get_public_data(&identity.username).await?;
    Ok(Json(user))
}
