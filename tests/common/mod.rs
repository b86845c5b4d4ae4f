//! Shared helpers for Web API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use sharing_backend::web::handlers::AppState;
use sharing_backend::web::router::create_router;
use sharing_backend::{Config, Database};

/// Prefix every API route is mounted under with the default config.
pub const API: &str = "/backend/v1";

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "sharing-backend-test-boundary";

/// Create a test configuration with a cheap password hash.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.jwt.secret = "test-secret-key-for-testing-only".to_string();
    config.password.memory_kib = 8;
    config.password.iterations = 1;
    config.password.parallelism = 1;
    config
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> TestServer {
    create_test_server_with(create_test_config()).await
}

/// Create a test server from the given configuration.
pub async fn create_test_server_with(config: Config) -> TestServer {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let app_state =
        Arc::new(AppState::from_config(&config, db).expect("Failed to create app state"));
    let router = create_router(app_state, &config);

    TestServer::new(router).expect("Failed to create test server")
}

/// Register a user and return the response.
pub async fn register(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post(&format!("{API}/users"))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .await
}

/// Log in and return the response.
pub async fn login(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post(&format!("{API}/login"))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .await
}

/// Register a user, log in and return the access token.
pub async fn register_and_login(server: &TestServer, username: &str, password: &str) -> String {
    register(server, username, password)
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let body: Value = login(server, username, password).await.json();
    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Build a multipart body with a single part.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Bytes {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Bytes::from(body)
}

/// Build a multipart body whose single part has no `Content-Type`.
pub fn untyped_multipart_body(field: &str, filename: &str, data: &[u8]) -> Bytes {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Bytes::from(body)
}

/// Upload a multipart body as the given user.
pub async fn upload_body(server: &TestServer, token: &str, body: Bytes) -> TestResponse {
    let length = body.len();
    server
        .post(&format!("{API}/files"))
        .add_header(AUTHORIZATION, token.to_string())
        .add_header(CONTENT_LENGTH, length.to_string())
        .bytes(body)
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .await
}

/// Upload a file in the `file` field as the given user.
pub async fn upload(
    server: &TestServer,
    token: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> TestResponse {
    upload_body(
        server,
        token,
        multipart_body("file", filename, content_type, data),
    )
    .await
}
