use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Relay routes.
///
/// ```text
/// /webhook?account={name}    relay_by_query
/// /webhook/{account}         relay_by_path
/// ```
///
/// Both accept any method so that non-POST requests get the relay's own
/// 405 body. Payloads are forwarded whole, so the default body limit is
/// lifted.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook", any(webhook::relay_by_query))
        .route("/webhook/{account}", any(webhook::relay_by_path))
        .layer(DefaultBodyLimit::disable())
}
