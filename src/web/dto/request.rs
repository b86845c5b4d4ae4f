//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{validate_password, validate_username};
use crate::web::error::ApiError;

/// Username and password, used by both registration and login.
///
/// Missing fields deserialize as empty strings so they are reported as
/// `required` validation failures rather than malformed JSON.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// Username.
    #[serde(default)]
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "john_doe")]
    pub username: String,
    /// Password.
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "password_1")]
    pub password: String,
}

/// Raw pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Records to skip (default 0).
    #[param(value_type = Option<i64>, minimum = 0)]
    pub skip: Option<String>,
    /// Page size (default from server configuration).
    #[param(value_type = Option<i64>, minimum = 1)]
    pub limit: Option<String>,
}

impl PaginationQuery {
    /// Parse the parameters, filling in defaults, and check their bounds.
    pub fn resolve(&self, default_limit: i64) -> Result<Pagination, ApiError> {
        let pagination = Pagination {
            skip: parse_param("skip", self.skip.as_deref(), 0)?,
            limit: parse_param("limit", self.limit.as_deref(), default_limit)?,
        };
        pagination
            .validate()
            .map_err(ApiError::from_validation_errors)?;
        Ok(pagination)
    }
}

fn parse_param(name: &str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<i64>().map_err(|e| {
            ApiError::bad_request(format!("Invalid format for query param '{name}'"))
                .with_detail(e.to_string())
        }),
    }
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct Pagination {
    /// Records to skip.
    #[validate(range(min = 0, code = "gte", message = "The field length is less than the specified length"))]
    pub skip: i64,
    /// Page size.
    #[validate(range(min = 1, code = "gte", message = "The field length is less than the specified length"))]
    pub limit: i64,
}
