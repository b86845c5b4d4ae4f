//! API error handling.
//!
//! Every failure leaves the server as `{ "summary": ..., "detail": ... }`
//! where `detail` is `null`, a string, or a list of field errors.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::SharingError;

/// Summary of every 422 response.
pub const VALIDATION_FAILED: &str = "Data validation failed";

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Forbidden (403).
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Method not allowed (405).
    MethodNotAllowed,
    /// Validation error (422) - for field-level validation errors.
    ValidationError,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A single failed field in a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Field name.
    #[schema(example = "username")]
    pub name: String,
    /// Fixed message describing the rule.
    #[schema(example = "Field required")]
    pub message: String,
}

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Short description of the failure.
    #[schema(example = "Invalid token")]
    pub summary: String,
    /// `null`, a string, or a list of field errors.
    #[schema(value_type = Object)]
    pub detail: Value,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    summary: String,
    detail: Value,
}

impl ApiError {
    /// Create a new API error with a `null` detail.
    pub fn new(code: ErrorCode, summary: impl Into<String>) -> Self {
        Self {
            code,
            summary: summary.into(),
            detail: Value::Null,
        }
    }

    /// Attach a detail string.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Value::String(detail.into());
        self
    }

    /// Create a bad request error.
    pub fn bad_request(summary: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, summary)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(summary: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, summary)
    }

    /// Create a forbidden error.
    pub fn forbidden(summary: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, summary)
    }

    /// Create a not found error.
    pub fn not_found(summary: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, summary)
    }

    /// Create a method not allowed error.
    pub fn method_not_allowed() -> Self {
        Self::new(ErrorCode::MethodNotAllowed, "Method not allowed")
    }

    /// Create an internal server error.
    pub fn internal(summary: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, summary)
    }

    /// Create a validation error from field errors.
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            summary: VALIDATION_FAILED.to_string(),
            detail: serde_json::to_value(fields).unwrap_or(Value::Null),
        }
    }

    /// Create a validation error from validator::ValidationErrors.
    ///
    /// One entry per failed field, ordered by field name.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, field_errors)| {
                field_errors.first().map(|e| FieldError {
                    name: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));

        Self::validation(fields)
    }

    /// The error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The summary line.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// The detail value.
    pub fn detail(&self) -> &Value {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), summary = %self.summary, detail = %self.detail, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), summary = %self.summary, detail = %self.detail, "Request rejected");
        }

        let body = ErrorBody {
            summary: self.summary,
            detail: self.detail,
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.summary)
    }
}

impl std::error::Error for ApiError {}

impl From<SharingError> for ApiError {
    fn from(err: SharingError) -> Self {
        match err {
            SharingError::Conflict(msg) | SharingError::BadRequest(msg) => {
                ApiError::bad_request(msg)
            }
            SharingError::NotFound(msg) => ApiError::not_found(msg),
            SharingError::Forbidden(msg) => ApiError::forbidden(msg),
            SharingError::AuthRequired => ApiError::unauthorized("Authorization token required"),
            SharingError::InvalidToken(msg) => ApiError::forbidden("Invalid token").with_detail(msg),
            SharingError::TokenExpired { expiration } => {
                ApiError::unauthorized("Token expired. Login to your account again")
                    .with_detail(format!("Expiration date: {}", expiration.to_rfc3339()))
            }
            SharingError::TokenGeneration(msg) => {
                ApiError::internal("Token generation error").with_detail(msg)
            }
            SharingError::Password(msg) => {
                ApiError::internal("Password processing error").with_detail(msg)
            }
            SharingError::Database(msg) => {
                ApiError::internal("Database interaction error").with_detail(msg)
            }
            other @ (SharingError::Config(_) | SharingError::Io(_)) => {
                ApiError::internal("Unexpected server error").with_detail(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid request body").with_detail(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("Invalid query string").with_detail(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sharing_error_mapping() {
        let cases = [
            (SharingError::Conflict("dup".into()), ErrorCode::BadRequest),
            (SharingError::BadRequest("bad".into()), ErrorCode::BadRequest),
            (SharingError::NotFound("gone".into()), ErrorCode::NotFound),
            (SharingError::Forbidden("no".into()), ErrorCode::Forbidden),
            (SharingError::AuthRequired, ErrorCode::Unauthorized),
            (SharingError::InvalidToken("sig".into()), ErrorCode::Forbidden),
            (
                SharingError::TokenExpired {
                    expiration: Utc::now(),
                },
                ErrorCode::Unauthorized,
            ),
            (SharingError::TokenGeneration("x".into()), ErrorCode::InternalError),
            (SharingError::Password("x".into()), ErrorCode::InternalError),
            (SharingError::Database("x".into()), ErrorCode::InternalError),
            (SharingError::Config("x".into()), ErrorCode::InternalError),
        ];

        for (err, code) in cases {
            let label = err.to_string();
            assert_eq!(ApiError::from(err).code(), code, "{label}");
        }
    }

    #[test]
    fn test_summaries_and_details() {
        let err = ApiError::from(SharingError::Conflict("User 'john_doe' already exist".into()));
        assert_eq!(err.summary(), "User 'john_doe' already exist");
        assert_eq!(err.detail(), &Value::Null);

        let err = ApiError::from(SharingError::AuthRequired);
        assert_eq!(err.summary(), "Authorization token required");

        let err = ApiError::from(SharingError::Database("disk I/O error".into()));
        assert_eq!(err.summary(), "Database interaction error");
        assert_eq!(err.detail(), &json!("disk I/O error"));

        let expiration = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let err = ApiError::from(SharingError::TokenExpired { expiration });
        assert_eq!(err.summary(), "Token expired. Login to your account again");
        assert_eq!(
            err.detail(),
            &json!("Expiration date: 2024-01-02T03:04:05+00:00")
        );
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Field required"))]
        zeta: String,
        #[validate(range(min = 1, message = "Too small"))]
        alpha: i64,
    }

    #[test]
    fn test_from_validation_errors_sorted() {
        let errors = Sample {
            zeta: String::new(),
            alpha: 0,
        }
        .validate()
        .unwrap_err();

        let err = ApiError::from_validation_errors(errors);
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.summary(), VALIDATION_FAILED);
        assert_eq!(
            err.detail(),
            &json!([
                {"name": "alpha", "message": "Too small"},
                {"name": "zeta", "message": "Field required"}
            ])
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::not_found("Route not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::method_not_allowed().into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
