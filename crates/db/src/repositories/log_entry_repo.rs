//! Repository for the `webhook_logs` table.

use hookrelay_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::log_entry::{LogEntry, NewLogEntry};

const COLUMNS: &str = "id, account_name, status, location, screenshot_url, created_at";

/// Insert and age-based delete for relay log rows.
pub struct LogEntryRepo;

impl LogEntryRepo {
    /// Insert a new log row, returning it with its assigned id and timestamp.
    pub async fn create(pool: &PgPool, input: &NewLogEntry) -> Result<LogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO webhook_logs (account_name, status, location, screenshot_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(&input.account_name)
            .bind(&input.status)
            .bind(&input.location)
            .bind(&input.screenshot_url)
            .fetch_one(pool)
            .await
    }

    /// Most recent rows first, optionally restricted to one account.
    pub async fn list_recent(
        pool: &PgPool,
        account_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webhook_logs \
             WHERE ($1::TEXT IS NULL OR account_name = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(account_name)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete rows created strictly before `cutoff`. Returns the number deleted.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM webhook_logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
