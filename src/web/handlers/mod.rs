//! Request handlers for Web API.

pub mod auth;
pub mod file;
pub mod health;
pub mod user;

pub use auth::login;
pub use file::{download_file, list_files, upload_file};
pub use health::health;
pub use user::{me, register};

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{CredentialHasher, DatabaseUserService, JwtTokenService, TokenService, UserService};
use crate::config::Config;
use crate::db::Database;
use crate::file::{
    DatabaseFilesMetadataService, DatabaseFilesService, FilesMetadataService, FilesService,
};
use crate::{Result, SharingError};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User registration and credential checks.
    pub users: Arc<dyn UserService>,
    /// Token issuing and verification.
    pub tokens: Arc<dyn TokenService>,
    /// File payloads.
    pub files: Arc<dyn FilesService>,
    /// File metadata.
    pub files_metadata: Arc<dyn FilesMetadataService>,
    /// Page size when a list request has no `limit`.
    pub pagination_default_limit: i64,
    /// Offset from creation to the advisory expiration stamp.
    pub file_lifetime: Duration,
    /// Upload limit in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Wire the store-backed services from configuration.
    pub fn from_config(config: &Config, db: Database) -> Result<Self> {
        let hasher = CredentialHasher::new(&config.password)?;
        let file_lifetime = Duration::try_minutes(config.files.minutes_lifetime_default)
            .ok_or_else(|| {
                SharingError::Config(format!(
                    "files.minutesLifetimeDefault {} is out of range",
                    config.files.minutes_lifetime_default
                ))
            })?;

        Ok(Self {
            users: Arc::new(DatabaseUserService::new(db.clone(), hasher)),
            tokens: Arc::new(JwtTokenService::from_config(&config.server.jwt)?),
            files: Arc::new(DatabaseFilesService::new(db.clone())),
            files_metadata: Arc::new(DatabaseFilesMetadataService::new(db)),
            pagination_default_limit: config.server.pagination_default_limit,
            file_lifetime,
            max_upload_size: config.files.max_upload_size_bytes(),
        })
    }
}
