//! Storage collaborator used by the relay handler.
//!
//! The handler only needs to append a row, prune by age, read recent rows
//! back, and check reachability. [`LogStore`] captures exactly that so the
//! backend can be chosen at startup (and swapped for an in-memory fake in
//! tests).

use async_trait::async_trait;
use hookrelay_core::types::Timestamp;

use crate::models::log_entry::{LogEntry, NewLogEntry};

mod postgres;
mod rest;

pub use postgres::PgLogStore;
pub use rest::RestLogStore;

/// Errors from any [`LogStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A sqlx error from the Postgres backend.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The HTTP request to the hosted store failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The hosted store returned a non-2xx status code.
    #[error("Log store returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one log row.
    async fn insert(&self, entry: &NewLogEntry) -> Result<(), StoreError>;

    /// Delete every row with `created_at < cutoff`, returning how many went.
    async fn delete_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError>;

    /// Newest rows first, optionally for a single account.
    async fn recent(&self, account: Option<&str>, limit: i64)
        -> Result<Vec<LogEntry>, StoreError>;

    /// Confirm the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
