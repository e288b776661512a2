//! MySQL implementation of the VerificationCodeRepository trait.
//!
//! Codes live in the `email_verification_codes` table. Quota and cooldown
//! checks are plain queries against it, and consumption is a conditional
//! `UPDATE` so that concurrent consumers are serialized by the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ev_core::domain::entities::verification_code::VerificationCode;
use ev_core::errors::StorageError;
use ev_core::repositories::VerificationCodeRepository;

/// MySQL implementation of VerificationCodeRepository
pub struct MySqlVerificationCodeRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationCodeRepository {
    /// Create a new MySQL verification code repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to VerificationCode entity
    fn row_to_code(row: &sqlx::mysql::MySqlRow) -> Result<VerificationCode, StorageError> {
        let id: String = row.try_get("id").map_err(|e| corrupt("id", e))?;

        Ok(VerificationCode {
            id: Uuid::parse_str(&id).map_err(|e| StorageError::CorruptRecord {
                message: format!("Invalid code UUID {}: {}", id, e),
            })?,
            email: row.try_get("email").map_err(|e| corrupt("email", e))?,
            code: row.try_get("code").map_err(|e| corrupt("code", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| corrupt("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| corrupt("expires_at", e))?,
            used: row.try_get("used").map_err(|e| corrupt("used", e))?,
            used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("used_at")
                .map_err(|e| corrupt("used_at", e))?,
        })
    }
}

fn corrupt(column: &str, err: sqlx::Error) -> StorageError {
    StorageError::CorruptRecord {
        message: format!("Failed to get {}: {}", column, err),
    }
}

fn backend(action: &str, err: sqlx::Error) -> StorageError {
    tracing::error!(error = %err, action = action, "Verification code query failed");
    StorageError::backend(format!("Failed to {}: {}", action, err))
}

#[async_trait]
impl VerificationCodeRepository for MySqlVerificationCodeRepository {
    async fn insert(&self, record: &VerificationCode) -> Result<(), StorageError> {
        let query = r#"
            INSERT INTO email_verification_codes (
                id, email, code, created_at, expires_at, used, used_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.email)
            .bind(&record.code)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.used)
            .bind(record.used_at)
            .execute(&self.pool)
            .await
            .map_err(|e| backend("save verification code", e))?;

        Ok(())
    }

    async fn count_issued_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let query = r#"
            SELECT COUNT(*) AS issued
            FROM email_verification_codes
            WHERE email = ? AND created_at >= ?
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| backend("count issued codes", e))?;

        let issued: i64 = row.try_get("issued").map_err(|e| corrupt("issued", e))?;
        Ok(issued.max(0) as u64)
    }

    async fn most_recent_issued_at(
        &self,
        email: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let query = r#"
            SELECT MAX(created_at) AS last_issued
            FROM email_verification_codes
            WHERE email = ?
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| backend("find last issued code", e))?;

        row.try_get::<Option<DateTime<Utc>>, _>("last_issued")
            .map_err(|e| corrupt("last_issued", e))
    }

    async fn find_consumable(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, StorageError> {
        let query = r#"
            SELECT id
            FROM email_verification_codes
            WHERE email = ?
                AND code = ?
                AND used = FALSE
                AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(email)
            .bind(code)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend("find verification code", e))?;

        match row {
            Some(row) => {
                let id: String = row.try_get("id").map_err(|e| corrupt("id", e))?;
                let id = Uuid::parse_str(&id).map_err(|e| StorageError::CorruptRecord {
                    message: format!("Invalid code UUID {}: {}", id, e),
                })?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, StorageError> {
        let query = r#"
            UPDATE email_verification_codes
            SET used = TRUE, used_at = ?
            WHERE id = ? AND used = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| backend("mark verification code used", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, StorageError> {
        let query = r#"
            SELECT id, email, code, created_at, expires_at, used, used_at
            FROM email_verification_codes
            WHERE id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend("find verification code by id", e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_code(&row)?)),
            None => Ok(None),
        }
    }
}
