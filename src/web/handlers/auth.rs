//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::web::dto::{CredentialsRequest, TokenResponse, ValidatedJson};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;
use crate::SharingError;

/// POST /v1/login - Exchange credentials for an access token.
///
/// Unknown usernames and wrong passwords get the same 403 response.
#[utoipa::path(
    post,
    path = "/v1/login",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 403, description = "Invalid credentials", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .users
        .authenticate(&req.username, &req.password)
        .await
        .map_err(|e| match e {
            SharingError::NotFound(_) | SharingError::Forbidden(_) => {
                tracing::info!(username = %req.username, reason = %e, "Login rejected");
                ApiError::forbidden("Invalid username or password")
            }
            other => other.into(),
        })?;

    let access_token = state.tokens.issue(&user.public())?;
    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(TokenResponse { access_token }))
}
