//! Retention window for relay log rows.

use crate::types::Timestamp;

/// Log rows older than this many minutes are eligible for deletion.
pub const RETENTION_MINUTES: i64 = 20;

/// The oldest `created_at` a log row may have at `now` and still be kept.
pub fn retention_cutoff(now: Timestamp) -> Timestamp {
    now - chrono::Duration::minutes(RETENTION_MINUTES)
}
