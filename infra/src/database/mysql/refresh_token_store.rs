//! MySQL implementation of the RefreshTokenStore trait.
//!
//! Records live in the `refresh_tokens` table keyed by the token value.
//! Uniqueness is enforced by the primary key, and rotation with revocation
//! runs the delete and the insert in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use tp_core::domain::entities::token::RefreshTokenRecord;
use tp_core::errors::StoreError;
use tp_core::repositories::RefreshTokenStore;
use tp_core::services::Deadline;

/// MySQL implementation of RefreshTokenStore
pub struct MySqlRefreshTokenStore {
    pool: MySqlPool,
}

impl MySqlRefreshTokenStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a record
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, StoreError> {
        Ok(RefreshTokenRecord {
            token: row
                .try_get("token")
                .map_err(|e| StoreError::backend(format!("Failed to get token: {}", e)))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| StoreError::backend(format!("Failed to get user_id: {}", e)))?,
            expire_date: row
                .try_get::<DateTime<Utc>, _>("expire_date")
                .map_err(|e| StoreError::backend(format!("Failed to get expire_date: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| StoreError::backend(format!("Failed to get created_at: {}", e)))?,
        })
    }

    async fn insert_with<'e, E>(
        executor: E,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
    ) -> Result<RefreshTokenRecord, StoreError>
    where
        E: sqlx::Executor<'e, Database = sqlx::MySql>,
    {
        let record = RefreshTokenRecord::new(token, user_id, lifetime_days).ok_or(
            StoreError::InvalidLifetime {
                days: lifetime_days,
            },
        )?;

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expire_date, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.token)
        .bind(&record.user_id)
        .bind(record.expire_date)
        .bind(record.created_at)
        .execute(executor)
        .await
        .map_err(|e| map_write_error(e, "Failed to save refresh token"))?;

        Ok(record)
    }
}

/// Map an insert failure, turning a primary key collision into `Duplicate`
pub(crate) fn map_write_error(err: sqlx::Error, context: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::backend(format!("{}: {}", context, err)),
    }
}

fn map_error(err: sqlx::Error, context: &str) -> StoreError {
    StoreError::backend(format!("{}: {}", context, err))
}

#[async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn get(
        &self,
        token: &str,
        deadline: &Deadline,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        deadline
            .run(async {
                let row = sqlx::query(
                    r#"
                    SELECT token, user_id, expire_date, created_at
                    FROM refresh_tokens
                    WHERE token = ? AND expire_date > ?
                    LIMIT 1
                    "#,
                )
                .bind(token)
                .bind(Utc::now())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_error(e, "Failed to find refresh token"))?;

                row.as_ref().map(Self::row_to_record).transpose()
            })
            .await
    }

    async fn insert(
        &self,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
        deadline: &Deadline,
    ) -> Result<RefreshTokenRecord, StoreError> {
        deadline
            .run(Self::insert_with(&self.pool, token, user_id, lifetime_days))
            .await
    }

    async fn replace(
        &self,
        previous: &str,
        token: &str,
        user_id: &str,
        lifetime_days: i64,
        deadline: &Deadline,
    ) -> Result<RefreshTokenRecord, StoreError> {
        deadline
            .run(async {
                // Dropping the transaction on any early return rolls it back.
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| map_error(e, "Failed to begin transaction"))?;

                let deleted = sqlx::query(
                    "DELETE FROM refresh_tokens WHERE token = ? AND expire_date > ?",
                )
                .bind(previous)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_error(e, "Failed to revoke refresh token"))?;

                if deleted.rows_affected() == 0 {
                    return Err(StoreError::NotFound);
                }

                let record = Self::insert_with(&mut *tx, token, user_id, lifetime_days).await?;

                tx.commit()
                    .await
                    .map_err(|e| map_error(e, "Failed to commit rotation"))?;

                Ok(record)
            })
            .await
    }

    async fn delete_expired(
        &self,
        now: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<u64, StoreError> {
        deadline
            .run(async {
                let result = sqlx::query("DELETE FROM refresh_tokens WHERE expire_date <= ?")
                    .bind(now)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_error(e, "Failed to delete expired tokens"))?;

                Ok(result.rows_affected())
            })
            .await
    }

    async fn ping(&self, deadline: &Deadline) -> Result<(), StoreError> {
        deadline
            .run(async {
                sqlx::query("SELECT 1")
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_error(e, "Database ping failed"))?;
                Ok(())
            })
            .await
    }
}
