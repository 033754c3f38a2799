//! # OTP Repository
//!
//! Password-reset codes.
//!
//! ## Flow
//! ```text
//! request-otp ──► create(email, code, now + 10 min)
//!
//! verify-otp  ──► consume(email, code, now)
//!                   newest unused, unexpired match
//!                   ├── found  → used = 1, Ok(true)
//!                   └── none   → Ok(false)
//! ```
//!
//! Codes are never deleted. Verification and password reset are separate
//! calls: nothing here links a consumed code to the later reset.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use stockmaster_core::Otp;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for one-time password codes.
#[derive(Debug, Clone)]
pub struct OtpRepository {
    pool: SqlitePool,
}

impl OtpRepository {
    /// Creates a new OtpRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OtpRepository { pool }
    }

    /// Stores a new code for `email`.
    pub async fn create(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> DbResult<Otp> {
        let now = Utc::now();

        let id = sqlx::query(
            r#"
            INSERT INTO otps (email, otp, expires_at, used, created_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(email = %email, otp_id = id, "OTP stored");

        Ok(Otp {
            id,
            email: email.to_string(),
            otp: code.to_string(),
            expires_at,
            used: false,
            created_at: now,
        })
    }

    /// Marks the newest matching, unused, unexpired code as used.
    ///
    /// ## Returns
    /// * `Ok(true)` - a code matched and was consumed
    /// * `Ok(false)` - no usable code
    pub async fn consume(&self, email: &str, code: &str, now: DateTime<Utc>) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let candidate = sqlx::query_as::<_, Otp>(
            r#"
            SELECT id, email, otp, expires_at, used, created_at
            FROM otps
            WHERE email = ?1 AND otp = ?2 AND used = 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .find(|otp| otp.is_valid_at(now));

        let Some(otp) = candidate else {
            debug!(email = %email, "No usable OTP");
            return Ok(false);
        };

        let result = sqlx::query("UPDATE otps SET used = 1 WHERE id = ?1")
            .bind(otp.id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("OTP", otp.id));
        }

        tx.commit().await?;
        debug!(email = %email, otp_id = otp.id, "OTP consumed");
        Ok(true)
    }

    /// Counts codes ever issued for `email`.
    #[cfg(test)]
    pub async fn count_for_email(&self, email: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM otps WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
