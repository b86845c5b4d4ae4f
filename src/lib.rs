//! Sharing backend
//!
//! A REST backend for user registration, token authentication and per-user
//! file upload, listing and download.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{
    CredentialHasher, DatabaseUserService, Identity, JwtTokenService, TokenService, UserService,
};
pub use config::Config;
pub use db::{Database, User, UserPublic};
pub use error::{Result, SharingError};
pub use file::{FileData, FileMetadata, FilesMetadataService, FilesService};
pub use web::{create_router, AppState, WebServer};
