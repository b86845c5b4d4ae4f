//! User registration, lookup and credential checks.

use async_trait::async_trait;

use super::password::CredentialHasher;
use crate::db::{Database, NewUser, User, UserPublic, UserRepository};
use crate::{Result, SharingError};

/// Operations over the `users` collection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user. A taken username fails with `Conflict`.
    async fn register(&self, username: &str, password: &str) -> Result<UserPublic>;

    /// Get the full user record, or `NotFound`.
    async fn get_by_username(&self, username: &str) -> Result<User>;

    /// Get the public projection of a user, or `NotFound`.
    async fn get_public_data(&self, username: &str) -> Result<UserPublic>;

    /// Check credentials.
    ///
    /// Unknown users fail with `NotFound`, a wrong password with `Forbidden`.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User>;
}

/// [`UserService`] backed by the SQLite store.
pub struct DatabaseUserService {
    db: Database,
    hasher: CredentialHasher,
}

impl DatabaseUserService {
    /// Create a new user service.
    pub fn new(db: Database, hasher: CredentialHasher) -> Self {
        Self { db, hasher }
    }
}

fn user_not_found(username: &str) -> SharingError {
    SharingError::NotFound(format!("User '{username}' not found"))
}

#[async_trait]
impl UserService for DatabaseUserService {
    async fn register(&self, username: &str, password: &str) -> Result<UserPublic> {
        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;

        let repo = UserRepository::new(self.db.pool());
        let user = repo
            .create(&NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(username = %user.username, "User registered");
        Ok(user.public())
    }

    async fn get_by_username(&self, username: &str) -> Result<User> {
        UserRepository::new(self.db.pool())
            .get_by_username(username)
            .await?
            .ok_or_else(|| user_not_found(username))
    }

    async fn get_public_data(&self, username: &str) -> Result<UserPublic> {
        Ok(self.get_by_username(username).await?.public())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = self.get_by_username(username).await?;

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !matches {
            return Err(SharingError::Forbidden("Invalid password".to_string()));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordConfig;

    async fn service() -> DatabaseUserService {
        let db = Database::open_in_memory().await.unwrap();
        let hasher = CredentialHasher::new(&PasswordConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        DatabaseUserService::new(db, hasher)
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let svc = service().await;

        let public = svc.register("john_doe", "password_1").await.unwrap();
        assert_eq!(public.username, "john_doe");

        let user = svc.authenticate("john_doe", "password_1").await.unwrap();
        assert_eq!(user.username, "john_doe");
        assert_ne!(user.password_hash, "password_1");
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let svc = service().await;
        svc.register("john_doe", "password_1").await.unwrap();

        let err = svc.register("john_doe", "password_2").await.unwrap_err();
        assert!(matches!(err, SharingError::Conflict(_)));
        assert_eq!(err.to_string(), "User 'john_doe' already exist");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let svc = service().await;
        svc.register("john_doe", "password_1").await.unwrap();

        let err = svc.authenticate("john_doe", "password_2").await.unwrap_err();
        assert!(matches!(err, SharingError::Forbidden(_)));
        assert_eq!(err.to_string(), "Invalid password");
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let svc = service().await;
        let err = svc.authenticate("ghost_user", "password_1").await.unwrap_err();
        assert!(matches!(err, SharingError::NotFound(_)));
        assert_eq!(err.to_string(), "User 'ghost_user' not found");
    }

    #[tokio::test]
    async fn test_get_public_data() {
        let svc = service().await;
        svc.register("john_doe", "password_1").await.unwrap();

        let public = svc.get_public_data("john_doe").await.unwrap();
        assert_eq!(public, UserPublic { username: "john_doe".to_string() });

        assert!(matches!(
            svc.get_public_data("jane_doe").await,
            Err(SharingError::NotFound(_))
        ));
    }
}
