//! The relay endpoint.
//!
//! Each request runs one fixed sequence: check the method, resolve the
//! account, forward the body, summarize the destination's reply, insert a
//! log row, prune rows past the retention window, respond. Any failure after
//! the account check answers 500, including store failures after the
//! destination already accepted the message.

use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use chrono::Utc;
use hookrelay_core::accounts::FALLBACK_ACCOUNT;
use hookrelay_core::retention::retention_cutoff;
use hookrelay_db::models::log_entry::NewLogEntry;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of a successful relay.
pub const FORWARDED_BODY: &str = "Forwarded & Logged";

#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub account: Option<String>,
}

/// ANY /webhook?account={name}
///
/// A missing `account` parameter resolves as the fallback account name,
/// which is rejected unless explicitly configured. A query string that does
/// not parse is treated as an unresolvable account, after the method check.
pub async fn relay_by_query(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<AccountQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<&'static str> {
    let account = match &query {
        Ok(Query(query)) => Ok(query.account.as_deref().unwrap_or(FALLBACK_ACCOUNT)),
        Err(rejection) => Err(AppError::UnreadableAccount(rejection.body_text())),
    };
    relay(&state, method, account, &headers, body).await
}

/// ANY /webhook/{account}
pub async fn relay_by_path(
    State(state): State<AppState>,
    method: Method,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<&'static str> {
    let account = match &path {
        Ok(Path(account)) => Ok(account.as_str()),
        Err(rejection) => Err(AppError::UnreadableAccount(rejection.body_text())),
    };
    relay(&state, method, account, &headers, body).await
}

async fn relay(
    state: &AppState,
    method: Method,
    account: Result<&str, AppError>,
    headers: &HeaderMap,
    body: Bytes,
) -> AppResult<&'static str> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed(method));
    }

    let account = account.map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook with unreadable account");
        e
    })?;

    let destination = state.accounts.resolve(account).map_err(|e| {
        tracing::warn!(account, error = %e, "Rejected webhook for unresolvable account");
        e
    })?;

    let payload_bytes = body.len();
    let message = state
        .forwarder
        .forward(destination, headers.get(CONTENT_TYPE), body)
        .await?;
    tracing::debug!(account, payload_bytes, "Payload accepted by destination");

    let entry = NewLogEntry::from_summary(account, message.summarize());
    state.store.insert(&entry).await?;

    let pruned = state
        .store
        .delete_older_than(retention_cutoff(Utc::now()))
        .await?;

    tracing::info!(
        account,
        status = %entry.status,
        location = %entry.location,
        has_screenshot = entry.screenshot_url.is_some(),
        pruned,
        "Webhook forwarded and logged"
    );

    Ok(FORWARDED_BODY)
}
