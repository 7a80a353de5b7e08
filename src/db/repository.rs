//! Repository pattern implementation for the credential store
//!
//! This module provides data access for user records. Email addresses are
//! stored lowercased; callers normalize before lookup or insert.

use crate::core::error::{AuthError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::User;
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Insert a new user record
    ///
    /// A UNIQUE-constraint violation on the email column is reported as
    /// `DuplicateEmail`, the same outcome as a positive pre-insert lookup,
    /// so registrations racing past the lookup still fail cleanly.
    pub async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, name, email, password_hash, created_at) \
                     VALUES (?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &user.id,
                        &user.name,
                        &user.email,
                        &user.password_hash,
                        &user.created_at,
                    ],
                )
                .map_err(|e| match e {
                    rusqlite::Error::SqliteFailure(err, _)
                        if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        AuthError::DuplicateEmail
                    }
                    other => AuthError::Database(other),
                })?;
                Ok(())
            })
            .await
    }

    /// Find a user by (lowercased) email, password digest included
    ///
    /// The digest is needed for login verification; callers must project to
    /// [`crate::db::models::PublicUser`] before returning anything.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, name, email, password_hash, created_at \
                     FROM users WHERE email = ?",
                    [&email],
                    |row| {
                        Ok(User {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                            password_hash: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()
                .map_err(AuthError::Database)
            })
            .await
    }

    /// Find a user by id, password digest included
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT id, name, email, password_hash, created_at \
                     FROM users WHERE id = ?",
                    [&id],
                    |row| {
                        Ok(User {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                            password_hash: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()
                .map_err(AuthError::Database)
            })
            .await
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .map_err(AuthError::Database)
            })
            .await
    }
}
