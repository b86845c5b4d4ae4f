//! Database schema and migrations.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded. Uniqueness of usernames and file identifiers is enforced
//! here, not in the services.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users collection
    r#"
CREATE TABLE users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL        -- Argon2id PHC string
);
"#,
    // v2: files metadata collection
    r#"
CREATE TABLE files_metadata (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    username    TEXT NOT NULL,
    size        INTEGER NOT NULL,
    mimetype    TEXT NOT NULL,
    creation    INTEGER NOT NULL,    -- epoch seconds
    expiration  INTEGER NOT NULL     -- epoch seconds, advisory only
);

CREATE INDEX idx_files_metadata_owner ON files_metadata(username, creation DESC);
"#,
    // v3: files payload collection
    r#"
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier  TEXT NOT NULL UNIQUE,
    data        BLOB NOT NULL
);
"#,
];
