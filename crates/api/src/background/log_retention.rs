//! Periodic cleanup of relay log rows past the retention window.
//!
//! The relay handler already prunes on every request, which leaves stale
//! rows behind whenever traffic stops. This job prunes on a fixed interval
//! using `tokio::time::interval` so retention does not depend on traffic.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hookrelay_core::retention::{retention_cutoff, RETENTION_MINUTES};
use hookrelay_db::store::{LogStore, StoreError};
use tokio_util::sync::CancellationToken;

/// Delete every row older than the retention window, once.
pub async fn sweep_once(store: &dyn LogStore) -> Result<u64, StoreError> {
    store.delete_older_than(retention_cutoff(Utc::now())).await
}

/// Run the retention loop until `cancel` is triggered.
///
/// The first sweep happens immediately. Failures are logged and the loop
/// keeps going.
pub async fn run(store: Arc<dyn LogStore>, every: Duration, cancel: CancellationToken) {
    tracing::info!(
        retention_minutes = RETENTION_MINUTES,
        interval_secs = every.as_secs(),
        backend = store.backend(),
        "Log retention job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Log retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(store.as_ref()).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Log retention: purged old rows");
                    }
                    Ok(_) => tracing::debug!("Log retention: no rows to purge"),
                    Err(e) => tracing::error!(error = %e, "Log retention: cleanup failed"),
                }
            }
        }
    }
}
