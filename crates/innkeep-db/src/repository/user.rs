//! # User Repository
//!
//! Staff account lookups used by the login flow. Password hashes are stored
//! and returned as-is; hashing and verification are the caller's business.

use std::time::Duration;

use chrono::Utc;
use innkeep_core::{validation, User};
use sqlx::SqlitePool;
use tracing::debug;

use super::with_timeout;
use crate::error::{DbError, DbResult};

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        UserRepository { pool, timeout }
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<User> {
        with_timeout("get_user_by_id", self.timeout, async {
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, first_name, last_name, email, password_hash,
                       access_level, created_at, updated_at
                FROM users
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
        })
        .await
    }

    /// Updates names, email and access level of one user.
    pub async fn update(&self, user: &User) -> DbResult<()> {
        validation::validate_name("first_name", &user.first_name)?;
        validation::validate_name("last_name", &user.last_name)?;
        validation::validate_email(&user.email)?;

        debug!(id = user.id, "Updating user");

        with_timeout("update_user", self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE users SET
                    first_name = ?1,
                    last_name = ?2,
                    email = ?3,
                    access_level = ?4,
                    updated_at = ?5
                WHERE id = ?6
                "#,
            )
            .bind(user.first_name.trim())
            .bind(user.last_name.trim())
            .bind(user.email.trim())
            .bind(user.access_level)
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("User", user.id));
            }
            Ok(())
        })
        .await
    }

    /// Returns `(id, password_hash)` for the account with this email.
    pub async fn credentials_by_email(&self, email: &str) -> DbResult<(i64, String)> {
        let email = email.trim();

        with_timeout("user_credentials_by_email", self.timeout, async {
            sqlx::query_as::<_, (i64, String)>(
                "SELECT id, password_hash FROM users WHERE email = ?1",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", email))
        })
        .await
    }

    /// Inserts a staff account with an already-hashed password.
    pub async fn insert(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        access_level: i64,
    ) -> DbResult<i64> {
        validation::validate_name("first_name", first_name)?;
        validation::validate_name("last_name", last_name)?;
        validation::validate_email(email)?;

        with_timeout("insert_user", self.timeout, async {
            let now = Utc::now();
            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO users (
                    first_name, last_name, email, password_hash,
                    access_level, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                RETURNING id
                "#,
            )
            .bind(first_name.trim())
            .bind(last_name.trim())
            .bind(email.trim())
            .bind(password_hash)
            .bind(access_level)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
            Ok(id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError, StoreError};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = db
            .users()
            .insert("Ada", "Admin", "admin@example.com", "$hash$", 3)
            .await
            .unwrap();
        (db, id)
    }

    #[tokio::test]
    async fn test_get_and_update_user() {
        let (db, id) = setup().await;

        let mut user = db.users().get_by_id(id).await.unwrap();
        assert_eq!(user.access_level, 3);

        user.first_name = "Adele".to_string();
        user.access_level = 1;
        db.users().update(&user).await.unwrap();

        let stored = db.users().get_by_id(id).await.unwrap();
        assert_eq!(stored.first_name, "Adele");
        assert_eq!(stored.access_level, 1);
        assert_eq!(stored.password_hash, "$hash$");
    }

    #[tokio::test]
    async fn test_credentials_by_email() {
        let (db, id) = setup().await;

        let (found, hash) = db.users().credentials_by_email("admin@example.com").await.unwrap();
        assert_eq!(found, id);
        assert_eq!(hash, "$hash$");

        let err = db.users().credentials_by_email("nobody@example.com").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (db, _) = setup().await;
        let err = db
            .users()
            .insert("Other", "Admin", "admin@example.com", "$x$", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Store(StoreError::UniqueViolation { .. })));
    }
}
