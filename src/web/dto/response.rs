//! Response DTOs for Web API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness probe response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok`.
    #[schema(example = "ok")]
    pub status: String,
}

impl HealthResponse {
    /// The healthy response.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token for the `Authorization` header.
    pub access_token: String,
}

/// Successful upload response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddFileResponse {
    /// Identifier to download the file with.
    #[schema(example = "MTNiMjY3ZTgtYzE4Yi00YjM3LTkxN2MtYjI5ZDE4ZTQwMDI2")]
    pub identifier: String,
}
