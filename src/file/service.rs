//! File and file metadata services.
//!
//! Metadata and payload live in separate collections and are written
//! without a transaction spanning both. [`store_file`] writes metadata
//! first, then the payload, and removes the metadata again when the
//! payload write fails.

use async_trait::async_trait;

use super::metadata::{FileMetadata, FileMetadataPage, FileMetadataRepository};
use super::storage::{FileData, FileDataRepository};
use crate::db::Database;
use crate::{Result, SharingError};

fn file_not_found(identifier: &str) -> SharingError {
    SharingError::NotFound(format!("File '{identifier}' not found"))
}

/// Operations over the `files` collection.
#[async_trait]
pub trait FilesService: Send + Sync {
    /// Store a payload and return its identifier.
    async fn add_file(&self, file: FileData) -> Result<String>;

    /// Load a payload, or `NotFound`.
    async fn get_file(&self, identifier: &str) -> Result<FileData>;

    /// Remove a payload, or `NotFound`.
    async fn remove_file(&self, identifier: &str) -> Result<()>;
}

/// Operations over the `files_metadata` collection.
#[async_trait]
pub trait FilesMetadataService: Send + Sync {
    /// Store a metadata record and return its identifier.
    async fn add_metadata(&self, metadata: FileMetadata) -> Result<String>;

    /// Load a metadata record, or `NotFound`.
    async fn get_metadata(&self, identifier: &str) -> Result<FileMetadata>;

    /// One page of an owner's records, newest first, with the owner's total.
    async fn list_metadata(&self, username: &str, skip: i64, limit: i64)
        -> Result<FileMetadataPage>;

    /// Remove a metadata record, or `NotFound`.
    async fn remove_metadata(&self, identifier: &str) -> Result<()>;
}

/// [`FilesService`] backed by the SQLite store.
pub struct DatabaseFilesService {
    db: Database,
}

impl DatabaseFilesService {
    /// Create a new files service.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FilesService for DatabaseFilesService {
    async fn add_file(&self, file: FileData) -> Result<String> {
        FileDataRepository::new(self.db.pool()).create(&file).await?;
        Ok(file.identifier)
    }

    async fn get_file(&self, identifier: &str) -> Result<FileData> {
        FileDataRepository::new(self.db.pool())
            .get_by_identifier(identifier)
            .await?
            .ok_or_else(|| file_not_found(identifier))
    }

    async fn remove_file(&self, identifier: &str) -> Result<()> {
        if FileDataRepository::new(self.db.pool()).delete(identifier).await? {
            Ok(())
        } else {
            Err(file_not_found(identifier))
        }
    }
}

/// [`FilesMetadataService`] backed by the SQLite store.
pub struct DatabaseFilesMetadataService {
    db: Database,
}

impl DatabaseFilesMetadataService {
    /// Create a new files metadata service.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FilesMetadataService for DatabaseFilesMetadataService {
    async fn add_metadata(&self, metadata: FileMetadata) -> Result<String> {
        FileMetadataRepository::new(self.db.pool())
            .create(&metadata)
            .await?;
        Ok(metadata.identifier)
    }

    async fn get_metadata(&self, identifier: &str) -> Result<FileMetadata> {
        FileMetadataRepository::new(self.db.pool())
            .get_by_identifier(identifier)
            .await?
            .ok_or_else(|| file_not_found(identifier))
    }

    async fn list_metadata(
        &self,
        username: &str,
        skip: i64,
        limit: i64,
    ) -> Result<FileMetadataPage> {
        let repo = FileMetadataRepository::new(self.db.pool());
        let records = repo.list_by_owner(username, skip, limit).await?;
        let total = repo.count_by_owner(username).await?;
        Ok(FileMetadataPage { records, total })
    }

    async fn remove_metadata(&self, identifier: &str) -> Result<()> {
        if FileMetadataRepository::new(self.db.pool())
            .delete(identifier)
            .await?
        {
            Ok(())
        } else {
            Err(file_not_found(identifier))
        }
    }
}

/// Persist an upload: metadata first, then the payload.
///
/// When the payload write fails the metadata record is removed and the
/// payload error is returned.
pub async fn store_file(
    metadata_service: &dyn FilesMetadataService,
    files_service: &dyn FilesService,
    metadata: FileMetadata,
    data: Vec<u8>,
) -> Result<String> {
    let identifier = metadata_service.add_metadata(metadata).await?;

    let file = FileData {
        identifier: identifier.clone(),
        data,
    };
    if let Err(e) = files_service.add_file(file).await {
        if let Err(cleanup) = metadata_service.remove_metadata(&identifier).await {
            tracing::warn!(
                identifier = %identifier,
                error = %cleanup,
                "Failed to remove metadata after payload write failure"
            );
        }
        return Err(e);
    }

    tracing::info!(identifier = %identifier, "File stored");
    Ok(identifier)
}
