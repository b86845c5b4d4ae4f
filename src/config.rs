//! Configuration module for the sharing backend.
//!
//! Configuration is read from a YAML file. Every key has a default except
//! the JWT secret, which must come from the file or `SHARING_JWT_SECRET`.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, SharingError};

/// Environment variable overriding `server.jwtConfig.secret`.
pub const JWT_SECRET_ENV: &str = "SHARING_JWT_SECRET";

/// Upper bound for `server.jwtConfig.daysLifespan` (100 years).
pub const MAX_DAYS_LIFESPAN: i64 = 36_500;

/// Upper bound for `files.minutesLifetimeDefault` (100 years).
pub const MAX_MINUTES_LIFETIME: i64 = MAX_DAYS_LIFESPAN * 24 * 60;

/// Store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Store connection URL.
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Timeout applied to pool acquisition and lock waits.
    #[serde(default = "default_db_timeout")]
    pub seconds_timeout: u64,
}

fn default_db_url() -> String {
    "sqlite://data/sharing-backend.db?mode=rwc".to_string()
}

fn default_db_timeout() -> u64 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            seconds_timeout: default_db_timeout(),
        }
    }
}

/// Token signing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtConfig {
    /// HMAC secret used to sign tokens.
    #[serde(default)]
    pub secret: String,
    /// Token lifetime in days.
    #[serde(default = "default_days_lifespan", alias = "DaysLifespan")]
    pub days_lifespan: i64,
}

fn default_days_lifespan() -> i64 {
    3
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            days_lifespan: default_days_lifespan(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// `host:port` to listen on.
    #[serde(default = "default_socket")]
    pub socket: String,
    /// Prefix for every route.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Swagger UI location below `base_path`.
    #[serde(default = "default_openapi_base_path")]
    pub openapi_base_path: String,
    /// Page size used when a list request has no `limit`.
    #[serde(default = "default_pagination_limit")]
    pub pagination_default_limit: i64,
    /// Token settings.
    #[serde(default, rename = "jwtConfig")]
    pub jwt: JwtConfig,
}

fn default_socket() -> String {
    "localhost:8000".to_string()
}

fn default_base_path() -> String {
    "/backend".to_string()
}

fn default_openapi_base_path() -> String {
    "/swagger".to_string()
}

fn default_pagination_limit() -> i64 {
    20
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket: default_socket(),
            base_path: default_base_path(),
            openapi_base_path: default_openapi_base_path(),
            pagination_default_limit: default_pagination_limit(),
            jwt: JwtConfig::default(),
        }
    }
}

/// Uploaded file configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfig {
    /// Minutes between creation and the advisory expiration stamp.
    #[serde(default = "default_minutes_lifetime")]
    pub minutes_lifetime_default: i64,
    /// Maximum request body size for uploads in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_minutes_lifetime() -> i64 {
    1
}

fn default_max_upload_size() -> u64 {
    10
}

impl FilesConfig {
    /// Upload limit in bytes.
    pub fn max_upload_size_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            minutes_lifetime_default: default_minutes_lifetime(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Argon2id work factor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    65536
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error, fatal).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Application name attached to request spans.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_app_name() -> String {
    "sharing-backend".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            app_name: default_app_name(),
            format: LogFormat::default(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Uploaded file configuration.
    #[serde(default, alias = "filesExpConfig")]
    pub files: FilesConfig,
    /// Password hashing configuration.
    #[serde(default)]
    pub password: PasswordConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logs: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SharingError::Config(format!("config file '{}' open error: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Load configuration from a YAML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(s: &str) -> Result<Self> {
        serde_yaml::from_str(s)
            .map_err(|e| SharingError::Config(format!("invalid config format: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SHARING_JWT_SECRET`: Override the JWT secret key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            if !secret.is_empty() {
                self.server.jwt.secret = secret;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(invalid("database.url must not be empty"));
        }
        if self.database.seconds_timeout == 0 {
            return Err(invalid("database.secondsTimeout must be greater than 0"));
        }

        validate_socket(&self.server.socket)?;
        if !self.server.base_path.is_empty() && !is_route_prefix(&self.server.base_path) {
            return Err(invalid(
                "server.basePath must start with '/' and must not end with '/'",
            ));
        }
        if !is_route_prefix(&self.server.openapi_base_path) {
            return Err(invalid(
                "server.openapiBasePath must start with '/' and must not end with '/'",
            ));
        }
        if self.server.pagination_default_limit < 1 {
            return Err(invalid("server.paginationDefaultLimit must be greater than 0"));
        }
        if self.server.jwt.secret.is_empty() {
            return Err(invalid(&format!(
                "server.jwtConfig.secret is not set. Set it in the config file or via {JWT_SECRET_ENV}"
            )));
        }
        if !(1..=MAX_DAYS_LIFESPAN).contains(&self.server.jwt.days_lifespan) {
            return Err(invalid(&format!(
                "server.jwtConfig.daysLifespan must be between 1 and {MAX_DAYS_LIFESPAN}"
            )));
        }

        if !(1..=MAX_MINUTES_LIFETIME).contains(&self.files.minutes_lifetime_default) {
            return Err(invalid(&format!(
                "files.minutesLifetimeDefault must be between 1 and {MAX_MINUTES_LIFETIME}"
            )));
        }
        if self.files.max_upload_size_mb == 0 {
            return Err(invalid("files.maxUploadSizeMb must be greater than 0"));
        }

        argon2::Params::new(
            self.password.memory_kib,
            self.password.iterations,
            self.password.parallelism,
            None,
        )
        .map_err(|e| invalid(&format!("password parameters are invalid: {e}")))?;

        if !crate::logging::is_known_level(&self.logs.level) {
            return Err(invalid(&format!(
                "logs.level '{}' is not one of fatal, error, warn, warning, info, debug, trace",
                self.logs.level
            )));
        }
        if self.logs.app_name.trim().is_empty() {
            return Err(invalid("logs.appName must not be empty"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> SharingError {
    SharingError::Config(msg.to_string())
}

fn is_route_prefix(path: &str) -> bool {
    path.len() > 1 && path.starts_with('/') && !path.ends_with('/')
}

fn validate_socket(socket: &str) -> Result<()> {
    let (host, port) = socket
        .rsplit_once(':')
        .ok_or_else(|| invalid("server.socket must have the form host:port"))?;
    if host.is_empty() {
        return Err(invalid("server.socket host must not be empty"));
    }
    port.parse::<u16>()
        .map_err(|_| invalid(&format!("server.socket port '{port}' is invalid")))?;
    Ok(())
}
