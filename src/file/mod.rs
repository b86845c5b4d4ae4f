//! File management module.
//!
//! This module provides the metadata and payload collections, the services
//! built on them, and identifier generation.

mod metadata;
mod service;
mod storage;

pub use metadata::{FileMetadata, FileMetadataPage, FileMetadataRepository};
pub use service::{
    store_file, DatabaseFilesMetadataService, DatabaseFilesService, FilesMetadataService,
    FilesService,
};
pub use storage::{FileData, FileDataRepository};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// MIME type recorded for non-empty uploads without a declared type.
pub const DEFAULT_MIMETYPE: &str = "application/octet-stream";

/// MIME type recorded for empty uploads without a declared type.
pub const EMPTY_MIMETYPE: &str = "application/x-empty";

/// Generate a new file identifier.
///
/// The text form of a random UUIDv4, base64url-encoded without padding.
pub fn generate_identifier() -> String {
    URL_SAFE_NO_PAD.encode(uuid::Uuid::new_v4().to_string())
}

/// MIME type for an upload: the declared one, else a size-based fallback.
pub fn resolve_mimetype(declared: Option<&str>, size: usize) -> String {
    match declared {
        Some(mimetype) if !mimetype.is_empty() => mimetype.to_string(),
        _ if size > 0 => DEFAULT_MIMETYPE.to_string(),
        _ => EMPTY_MIMETYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identifier() {
        let id = generate_identifier();
        // 36 character UUID text -> 48 base64 characters
        assert_eq!(id.len(), 48);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded = URL_SAFE_NO_PAD.decode(&id).unwrap();
        let text = String::from_utf8(decoded).unwrap();
        assert!(uuid::Uuid::parse_str(&text).is_ok());

        assert_ne!(generate_identifier(), id);
    }

    #[test]
    fn test_resolve_mimetype() {
        assert_eq!(resolve_mimetype(Some("image/png"), 10), "image/png");
        assert_eq!(resolve_mimetype(None, 10), DEFAULT_MIMETYPE);
        assert_eq!(resolve_mimetype(Some(""), 10), DEFAULT_MIMETYPE);
        assert_eq!(resolve_mimetype(None, 0), EMPTY_MIMETYPE);
    }
}
