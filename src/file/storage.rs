//! File payload records and repository.

use crate::db::{conflict_or_database, DbPool};
use crate::Result;

/// Raw payload of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileData {
    /// Identifier shared with the metadata record.
    pub identifier: String,
    /// File bytes.
    pub data: Vec<u8>,
}

/// Repository for the `files` collection.
pub struct FileDataRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileDataRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a payload.
    pub async fn create(&self, file: &FileData) -> Result<()> {
        sqlx::query("INSERT INTO files (identifier, data) VALUES ($1, $2)")
            .bind(&file.identifier)
            .bind(&file.data)
            .execute(self.pool)
            .await
            .map_err(|e| {
                conflict_or_database(e, || format!("File '{}' already exist", file.identifier))
            })?;
        Ok(())
    }

    /// Get a payload by identifier.
    pub async fn get_by_identifier(&self, identifier: &str) -> Result<Option<FileData>> {
        let file = sqlx::query_as::<_, FileData>(
            "SELECT identifier, data FROM files WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// Delete a payload. Returns whether a record was removed.
    pub async fn delete(&self, identifier: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE identifier = $1")
            .bind(identifier)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
