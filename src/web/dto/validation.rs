//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::auth::validation::{is_valid_filename, is_valid_password, is_valid_username};
use crate::web::error::ApiError;

/// Message for a missing or empty field.
pub const REQUIRED_MESSAGE: &str = "Field required";

/// Message for a numeric field below its lower bound.
pub const GTE_MESSAGE: &str = "The field length is less than the specified length";

/// Message for a malformed username.
pub const USERNAME_MESSAGE: &str =
    "Username can only contain latin symbols, numbers, symbols '_-' with length 4-24";

/// Message for a malformed password.
pub const PASSWORD_MESSAGE: &str =
    "Password can only contain latin symbols, numbers, symbols '_!@#$%^&*' with length 8-24";

/// Message for a malformed file name.
pub const FILENAME_MESSAGE: &str =
    "File name should not contain symbols <>:\"\\/|?* and should have length 1-200";

/// A JSON extractor that validates the request body.
///
/// Malformed JSON is rejected with 400. A body that deserializes but breaks
/// a field rule is rejected with 422 and one entry per failing field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Custom Validators
// ============================================================================

fn required() -> ValidationError {
    ValidationError::new("required").with_message(REQUIRED_MESSAGE.into())
}

/// Username rule, or `required` when empty.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(required());
    }
    if !is_valid_username(value) {
        return Err(ValidationError::new("username").with_message(USERNAME_MESSAGE.into()));
    }
    Ok(())
}

/// Password rule, or `required` when empty.
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(required());
    }
    if !is_valid_password(value) {
        return Err(ValidationError::new("password").with_message(PASSWORD_MESSAGE.into()));
    }
    Ok(())
}

/// File name rule, or `required` when empty.
pub fn validate_filename(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(required());
    }
    if !is_valid_filename(value) {
        return Err(ValidationError::new("filename").with_message(FILENAME_MESSAGE.into()));
    }
    Ok(())
}
