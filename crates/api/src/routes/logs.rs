use axum::routing::get;
use axum::Router;

use crate::handlers::logs;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/logs", get(logs::list_logs))
}
