//! Bearer token authorization middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::Identity;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::SharingError;

/// Read the token from the `Authorization` header.
///
/// Both a bare token and `Bearer <token>` are accepted.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => value,
    }
    .trim();
    (!token.is_empty()).then_some(token)
}

/// Verify the request's token and attach the [`Identity`] to its extensions.
///
/// A missing header is rejected before the token service is consulted.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(SharingError::AuthRequired)?;
    let identity = state.tokens.verify(token)?;

    tracing::debug!(username = %identity.username, "Request authenticated");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated identity.
///
/// Only usable on routes behind [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::forbidden("Request not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_raw() {
        assert_eq!(bearer_token(&headers("abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_prefixed() {
        assert_eq!(
            bearer_token(&headers("Bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_bearer_token_missing_or_empty() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("  ")), None);
    }

    #[test]
    fn test_bearer_token_extra_whitespace() {
        assert_eq!(
            bearer_token(&headers("Bearer   abc.def.ghi ")),
            Some("abc.def.ghi")
        );
    }
}
