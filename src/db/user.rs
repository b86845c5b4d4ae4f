//! User records and repository.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{conflict_or_database, DbPool};
use crate::Result;

/// Registered user as stored in the `users` collection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Row ID.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Argon2id PHC string. Never leaves the service layer.
    pub password_hash: String,
}

impl User {
    /// Externally visible projection of this user.
    pub fn public(&self) -> UserPublic {
        UserPublic {
            username: self.username.clone(),
        }
    }
}

/// Public user data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    /// Username.
    #[schema(example = "john_doe")]
    pub username: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username.
    pub username: String,
    /// Already hashed password.
    pub password_hash: String,
}

/// Repository for the `users` collection.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a user.
    ///
    /// A duplicate username fails with `Conflict` from the unique index.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            conflict_or_database(e, || {
                format!("User '{}' already exist", new_user.username)
            })
        })?;

        Ok(User {
            id,
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
        })
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Count registered users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::SharingError;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let created = repo.create(&new_user("john_doe")).await.unwrap();
        assert_eq!(created.username, "john_doe");

        let found = repo.get_by_username("john_doe").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, created.password_hash);
        assert_eq!(found.public().username, "john_doe");
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        repo.create(&new_user("john_doe")).await.unwrap();
        let err = repo.create(&new_user("john_doe")).await.unwrap_err();

        match err {
            SharingError::Conflict(msg) => assert_eq!(msg, "User 'john_doe' already exist"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
