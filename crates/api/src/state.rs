use std::sync::Arc;

use hookrelay_core::accounts::AccountRegistry;
use hookrelay_db::store::LogStore;

use crate::forward::Forwarder;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Everything here is immutable after startup and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Account name to destination webhook mapping.
    pub accounts: Arc<AccountRegistry>,
    /// Client used to forward payloads to destinations.
    pub forwarder: Forwarder,
    /// Where relay log rows are written.
    pub store: Arc<dyn LogStore>,
}
