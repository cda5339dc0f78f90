//! Relay log entity and insert DTO.
//!
//! Log rows have no `updated_at`: they are inserted once and only ever
//! removed by the retention cleanup.

use hookrelay_core::discord::MessageSummary;
use hookrelay_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `webhook_logs` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: DbId,
    pub account_name: String,
    pub status: String,
    pub location: String,
    pub screenshot_url: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a log row. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLogEntry {
    pub account_name: String,
    pub status: String,
    pub location: String,
    pub screenshot_url: Option<String>,
}

impl NewLogEntry {
    pub fn from_summary(account_name: impl Into<String>, summary: MessageSummary) -> Self {
        Self {
            account_name: account_name.into(),
            status: summary.status,
            location: summary.location,
            screenshot_url: summary.screenshot_url,
        }
    }
}
