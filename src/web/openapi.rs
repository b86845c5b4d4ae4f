//! OpenAPI document and Swagger UI.

use utoipa::{
    openapi::{
        security::{ApiKey, ApiKeyValue, SecurityScheme},
        server::Server,
    },
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ServerConfig;
use crate::db::UserPublic;
use crate::file::{FileMetadata, FileMetadataPage};
use crate::web::dto::{AddFileResponse, CredentialsRequest, HealthResponse, TokenResponse};
use crate::web::error::{ErrorBody, FieldError};
use crate::web::handlers;

/// Generated API description.
#[derive(OpenApi)]
#[openapi(
    info(title = "Sharing backend", description = "File sharing REST API"),
    paths(
        handlers::health::health,
        handlers::auth::login,
        handlers::user::register,
        handlers::user::me,
        handlers::file::upload_file,
        handlers::file::list_files,
        handlers::file::download_file,
    ),
    components(schemas(
        CredentialsRequest,
        TokenResponse,
        HealthResponse,
        UserPublic,
        AddFileResponse,
        FileMetadata,
        FileMetadataPage,
        ErrorBody,
        FieldError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Token issuing"),
        (name = "users", description = "Registration and profile"),
        (name = "files", description = "Upload, listing and download")
    )
)]
pub struct ApiDoc;

/// Registers the `Authorization` header scheme used by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "User",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

/// The document with the configured base path as its server.
pub fn api_doc(config: &ServerConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let base = if config.base_path.is_empty() {
        "/".to_string()
    } else {
        config.base_path.clone()
    };
    doc.servers = Some(vec![Server::new(base)]);
    doc
}

/// Swagger UI at `{basePath}{openapiBasePath}`, document at
/// `{basePath}/api-docs/openapi.json`.
pub fn swagger_ui(config: &ServerConfig) -> SwaggerUi {
    SwaggerUi::new(format!("{}{}", config.base_path, config.openapi_base_path)).url(
        format!("{}/api-docs/openapi.json", config.base_path),
        api_doc(config),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_paths() {
        let doc = api_doc(&ServerConfig::default());
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/v1/health",
            "/v1/login",
            "/v1/users",
            "/v1/users/me",
            "/v1/files",
            "/v1/files/{identifier}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
        assert_eq!(doc.servers.unwrap()[0].url, "/backend");
    }

    #[test]
    fn test_security_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("User"));
    }
}
