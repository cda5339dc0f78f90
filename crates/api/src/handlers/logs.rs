//! Read access to recent relay log rows, for dashboards.

use axum::extract::{Query, State};
use axum::Json;
use hookrelay_db::models::log_entry::LogEntry;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Rows returned when no `limit` is given.
pub const DEFAULT_LIMIT: i64 = 50;

/// Upper bound on `limit`.
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub account: Option<String>,
    pub limit: Option<i64>,
}

/// GET /logs?account={name}&limit={n}
///
/// Newest rows first. Only rows still inside the retention window exist.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> AppResult<Json<DataResponse<Vec<LogEntry>>>> {
    let limit = match query.limit {
        None => DEFAULT_LIMIT,
        Some(n) if (1..=MAX_LIMIT).contains(&n) => n,
        Some(n) => {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {n}"
            )))
        }
    };

    let rows = state.store.recent(query.account.as_deref(), limit).await?;
    Ok(Json(DataResponse { data: rows }))
}
