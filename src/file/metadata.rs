//! File metadata records and repository.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::{conflict_or_database, DbPool};
use crate::web::dto::validation::validate_filename;
use crate::Result;

/// Descriptive record of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema, sqlx::FromRow)]
pub struct FileMetadata {
    /// Opaque unique identifier shared with the payload record.
    #[schema(example = "MTNiMjY3ZTgtYzE4Yi00YjM3LTkxN2MtYjI5ZDE4ZTQwMDI2")]
    pub identifier: String,
    /// Original file name.
    #[validate(custom(function = "validate_filename"))]
    #[schema(example = "my_image.png")]
    pub name: String,
    /// Owner username.
    pub username: String,
    /// Size in bytes.
    #[validate(range(min = 1, code = "required", message = "Field required"))]
    pub size: i64,
    /// MIME type.
    #[schema(example = "image/png")]
    pub mimetype: String,
    /// Creation time (epoch seconds).
    pub creation: i64,
    /// Advisory expiration time (epoch seconds).
    pub expiration: i64,
}

/// One page of a user's metadata records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileMetadataPage {
    /// Records on this page, newest first.
    pub records: Vec<FileMetadata>,
    /// Number of records the owner has in total.
    pub total: i64,
}

/// Repository for the `files_metadata` collection.
pub struct FileMetadataRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileMetadataRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a metadata record.
    pub async fn create(&self, metadata: &FileMetadata) -> Result<()> {
        sqlx::query(
            "INSERT INTO files_metadata
                 (identifier, name, username, size, mimetype, creation, expiration)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&metadata.identifier)
        .bind(&metadata.name)
        .bind(&metadata.username)
        .bind(metadata.size)
        .bind(&metadata.mimetype)
        .bind(metadata.creation)
        .bind(metadata.expiration)
        .execute(self.pool)
        .await
        .map_err(|e| {
            conflict_or_database(e, || {
                format!("File '{}' already exist", metadata.identifier)
            })
        })?;

        Ok(())
    }

    /// Get a metadata record by identifier.
    pub async fn get_by_identifier(&self, identifier: &str) -> Result<Option<FileMetadata>> {
        let metadata = sqlx::query_as::<_, FileMetadata>(
            "SELECT identifier, name, username, size, mimetype, creation, expiration
             FROM files_metadata WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        Ok(metadata)
    }

    /// List an owner's records, newest first.
    ///
    /// Records with the same creation second are ordered by insertion, latest first.
    pub async fn list_by_owner(
        &self,
        username: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<FileMetadata>> {
        let records = sqlx::query_as::<_, FileMetadata>(
            "SELECT identifier, name, username, size, mimetype, creation, expiration
             FROM files_metadata
             WHERE username = $1
             ORDER BY creation DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(username)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Count an owner's records.
    pub async fn count_by_owner(&self, username: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files_metadata WHERE username = $1")
            .bind(username)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Delete a record. Returns whether a record was removed.
    pub async fn delete(&self, identifier: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files_metadata WHERE identifier = $1")
            .bind(identifier)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::SharingError;

    fn metadata(identifier: &str, owner: &str, creation: i64) -> FileMetadata {
        FileMetadata {
            identifier: identifier.to_string(),
            name: format!("{identifier}.txt"),
            username: owner.to_string(),
            size: 10,
            mimetype: "text/plain".to_string(),
            creation,
            expiration: creation + 60,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = FileMetadataRepository::new(db.pool());

        let record = metadata("abc", "john_doe", 1_700_000_000);
        repo.create(&record).await.unwrap();

        let found = repo.get_by_identifier("abc").await.unwrap().unwrap();
        assert_eq!(found, record);
        assert!(repo.get_by_identifier("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_identifier_conflicts() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = FileMetadataRepository::new(db.pool());

        repo.create(&metadata("abc", "john_doe", 1)).await.unwrap();
        let err = repo.create(&metadata("abc", "jane_doe", 2)).await.unwrap_err();
        assert!(matches!(err, SharingError::Conflict(_)));
        assert_eq!(err.to_string(), "File 'abc' already exist");
    }

    #[tokio::test]
    async fn test_list_orders_and_filters() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = FileMetadataRepository::new(db.pool());

        repo.create(&metadata("old", "john_doe", 100)).await.unwrap();
        repo.create(&metadata("new", "john_doe", 300)).await.unwrap();
        repo.create(&metadata("tie-first", "john_doe", 200)).await.unwrap();
        repo.create(&metadata("tie-second", "john_doe", 200)).await.unwrap();
        repo.create(&metadata("foreign", "jane_doe", 400)).await.unwrap();

        let records = repo.list_by_owner("john_doe", 0, 10).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["new", "tie-second", "tie-first", "old"]);

        let page = repo.list_by_owner("john_doe", 1, 2).await.unwrap();
        let ids: Vec<&str> = page.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["tie-second", "tie-first"]);

        assert_eq!(repo.count_by_owner("john_doe").await.unwrap(), 4);
        assert_eq!(repo.count_by_owner("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = FileMetadataRepository::new(db.pool());

        repo.create(&metadata("abc", "john_doe", 1)).await.unwrap();
        assert!(repo.delete("abc").await.unwrap());
        assert!(!repo.delete("abc").await.unwrap());
        assert!(repo.get_by_identifier("abc").await.unwrap().is_none());
    }

    #[test]
    fn test_validate_metadata() {
        let valid = metadata("abc", "john_doe", 1);
        assert!(valid.validate().is_ok());

        let mut empty = valid.clone();
        empty.size = 0;
        let errors = empty.validate().unwrap_err();
        assert_eq!(errors.field_errors()["size"][0].code, "required");

        let mut bad_name = valid.clone();
        bad_name.name = "a/b.txt".to_string();
        let errors = bad_name.validate().unwrap_err();
        assert_eq!(errors.field_errors()["name"][0].code, "filename");
    }
}
