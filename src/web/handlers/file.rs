//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use axum_extra::{extract::WithRejection, headers::ContentLength, TypedHeader};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::file::{
    generate_identifier, resolve_mimetype, store_file, FileMetadata, FileMetadataPage,
};
use crate::web::dto::{AddFileResponse, PaginationQuery};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

fn file_request_error() -> ApiError {
    ApiError::bad_request("Failed to parse file data request. Invalid structure")
}

/// Build the Content-Disposition header value for a download.
///
/// The name is percent-encoded, so quotes and control characters cannot
/// escape the parameter and spaces become `%20`.
fn content_disposition_header(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", urlencoding::encode(filename))
}

/// POST /v1/files - Upload a file.
///
/// Request body: multipart/form-data with a "file" field. The request
/// `Content-Length` is required and bounds how many bytes are accepted.
#[utoipa::path(
    post,
    path = "/v1/files",
    tag = "files",
    request_body(content = String, content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 201, description = "File stored", body = AddFileResponse),
        (status = 400, description = "Malformed multipart request", body = ErrorBody),
        (status = 401, description = "Token missing or expired", body = ErrorBody),
        (status = 403, description = "Invalid token", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    ),
    security(
        ("User" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    content_length: Option<TypedHeader<ContentLength>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AddFileResponse>), ApiError> {
    let TypedHeader(ContentLength(declared)) = content_length.ok_or_else(|| {
        file_request_error().with_detail("Content-Length header is missing or invalid")
    })?;
    let capacity = usize::try_from(declared)
        .unwrap_or(usize::MAX)
        .min(state.max_upload_size);

    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        file_request_error().with_detail(e.body_text())
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);

        let mut data = Vec::with_capacity(capacity);
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            tracing::debug!("Failed to read file content: {}", e);
            file_request_error().with_detail(e.body_text())
        })? {
            if (data.len() + chunk.len()) as u64 > declared {
                return Err(file_request_error()
                    .with_detail("File content is larger than the declared Content-Length"));
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some((name, content_type, data));
        break;
    }

    let (name, content_type, data) = upload.ok_or_else(|| {
        file_request_error().with_detail(format!("Multipart field '{FILE_FIELD}' is missing"))
    })?;

    let now = Utc::now();
    let expiration = now.checked_add_signed(state.file_lifetime).ok_or_else(|| {
        ApiError::internal("Unexpected server error")
            .with_detail("File lifetime overflows the expiration date")
    })?;
    let metadata = FileMetadata {
        identifier: generate_identifier(),
        name,
        username: identity.username,
        size: data.len() as i64,
        mimetype: resolve_mimetype(content_type.as_deref(), data.len()),
        creation: now.timestamp(),
        expiration: expiration.timestamp(),
    };
    metadata
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    tracing::info!(
        username = %metadata.username,
        name = %metadata.name,
        size = metadata.size,
        "Storing uploaded file"
    );
    let identifier = store_file(
        state.files_metadata.as_ref(),
        state.files.as_ref(),
        metadata,
        data,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(AddFileResponse { identifier })))
}

/// GET /v1/files - List the caller's files, newest first.
#[utoipa::path(
    get,
    path = "/v1/files",
    tag = "files",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page of file metadata", body = FileMetadataPage),
        (status = 400, description = "Unparsable query parameter", body = ErrorBody),
        (status = 401, description = "Token missing or expired", body = ErrorBody),
        (status = 403, description = "Invalid token", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    ),
    security(
        ("User" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> Result<Json<FileMetadataPage>, ApiError> {
    let pagination = query.resolve(state.pagination_default_limit)?;

    let page = state
        .files_metadata
        .list_metadata(&identity.username, pagination.skip, pagination.limit)
        .await?;

    Ok(Json(page))
}

/// GET /v1/files/{identifier} - Download a file.
///
/// No authentication: the identifier is the capability.
#[utoipa::path(
    get,
    path = "/v1/files/{identifier}",
    tag = "files",
    params(
        ("identifier" = String, Path, description = "File identifier")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorBody),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let (metadata, file) = tokio::try_join!(
        state.files_metadata.get_metadata(&identifier),
        state.files.get_file(&identifier),
    )?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, metadata.mimetype.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&metadata.name),
        )
        .header(header::CONTENT_LENGTH, file.data.len())
        .body(Body::from(file.data))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Unexpected server error").with_detail(e.to_string())
        })?;

    Ok(response)
}
