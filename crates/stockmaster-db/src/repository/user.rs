//! # User Repository
//!
//! Accounts, roles and password hashes. Hashing itself happens in the API
//! layer; this repository only stores the PHC string.

use chrono::Utc;
use sqlx::SqlitePool;
use stockmaster_core::{Role, User};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const SELECT_USER: &str = r#"
    SELECT id, name, email, password_hash, role, avatar, created_at, updated_at
    FROM users
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers a user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> DbResult<User> {
        if self.find_by_email(email).await?.is_some() {
            return Err(DbError::duplicate("email", email));
        }

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(user_id = id, %role, "User registered");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by email (exact match).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Looking up user by email");

        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE email = ?1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Overwrites the password hash of every account with this email.
    ///
    /// ## Returns
    /// Number of rows changed. Zero is not an error: the reset endpoint
    /// reports success regardless.
    pub async fn update_password(&self, email: &str, password_hash: &str) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE email = ?3",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(email)
        .execute(&self.pool)
        .await?;

        info!(email = %email, rows = result.rows_affected(), "Password reset");
        Ok(result.rows_affected())
    }

    /// Counts registered users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
