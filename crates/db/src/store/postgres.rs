use async_trait::async_trait;
use hookrelay_core::types::Timestamp;

use super::{LogStore, StoreError};
use crate::models::log_entry::{LogEntry, NewLogEntry};
use crate::repositories::LogEntryRepo;
use crate::DbPool;

/// [`LogStore`] backed by the `webhook_logs` table through a sqlx pool.
#[derive(Clone)]
pub struct PgLogStore {
    pool: DbPool,
}

impl PgLogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn insert(&self, entry: &NewLogEntry) -> Result<(), StoreError> {
        let row = LogEntryRepo::create(&self.pool, entry).await?;
        tracing::debug!(log_id = row.id, account = %row.account_name, "Log row inserted");
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        Ok(LogEntryRepo::delete_older_than(&self.pool, cutoff).await?)
    }

    async fn recent(
        &self,
        account: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LogEntry>, StoreError> {
        Ok(LogEntryRepo::list_recent(&self.pool, account, limit).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
