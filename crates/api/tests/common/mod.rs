//! Shared fixtures for the API integration tests.
//!
//! Tests drive the real router (same middleware stack as production) with an
//! in-memory [`LogStore`] and a fake destination webhook served by axum on
//! an ephemeral port.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::Response;
use axum::routing::post as route_post;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hookrelay_api::config::{ServerConfig, StoreConfig};
use hookrelay_api::forward::Forwarder;
use hookrelay_api::router::build_app_router;
use hookrelay_api::state::AppState;
use hookrelay_core::accounts::AccountRegistry;
use hookrelay_core::types::Timestamp;
use hookrelay_db::models::log_entry::{LogEntry, NewLogEntry};
use hookrelay_db::store::{LogStore, StoreError};

// ---------------------------------------------------------------------------
// In-memory log store
// ---------------------------------------------------------------------------

/// [`LogStore`] keeping rows in a vector. `created_at` is assigned on insert,
/// like the column default in Postgres.
#[derive(Default)]
pub struct MemoryLogStore {
    rows: Mutex<Vec<LogEntry>>,
    next_id: AtomicI64,
    failing: bool,
}

impl MemoryLogStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store whose every operation fails, as if the database were down.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    /// Insert a row that was created `age` ago.
    pub fn seed(&self, account: &str, age: Duration) {
        let row = self.row(account, "Update", Utc::now() - age);
        self.rows.lock().unwrap().push(row);
    }

    pub fn rows(&self) -> Vec<LogEntry> {
        self.rows.lock().unwrap().clone()
    }

    fn row(&self, account: &str, status: &str, created_at: Timestamp) -> LogEntry {
        LogEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            account_name: account.to_string(),
            status: status.to_string(),
            location: "Unknown".to_string(),
            screenshot_url: None,
            created_at,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::HttpStatus {
                status: 503,
                body: "store unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn insert(&self, entry: &NewLogEntry) -> Result<(), StoreError> {
        self.check()?;
        let mut row = self.row(&entry.account_name, &entry.status, Utc::now());
        row.location = entry.location.clone();
        row.screenshot_url = entry.screenshot_url.clone();
        self.rows.lock().unwrap().push(row);
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.created_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn recent(
        &self,
        account: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LogEntry>, StoreError> {
        self.check()?;
        let mut rows: Vec<LogEntry> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| account.map_or(true, |a| row.account_name == a))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// ---------------------------------------------------------------------------
// Fake destination webhook
// ---------------------------------------------------------------------------

/// One request received by a [`FakeDestination`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

struct DestinationState {
    status: StatusCode,
    reply: String,
    captured: Mutex<Vec<CapturedRequest>>,
}

/// A destination webhook that records what it receives and answers with a
/// canned status and body.
pub struct FakeDestination {
    pub url: String,
    state: Arc<DestinationState>,
}

impl FakeDestination {
    pub async fn start(status: StatusCode, reply: impl Into<String>) -> Self {
        let state = Arc::new(DestinationState {
            status,
            reply: reply.into(),
            captured: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/webhooks/{id}/{token}", route_post(capture))
            .layer(DefaultBodyLimit::disable())
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/api/webhooks/1200/secret-token"),
            state,
        }
    }

    /// A destination answering 200 with the given message object.
    pub async fn replying(message: serde_json::Value) -> Self {
        Self::start(StatusCode::OK, message.to_string()).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }
}

async fn capture(
    State(state): State<Arc<DestinationState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], String) {
    state.captured.lock().unwrap().push(CapturedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (
        state.status,
        [(CONTENT_TYPE, "application/json")],
        state.reply.clone(),
    )
}

/// A URL on which nothing is listening, for simulating network failures.
pub async fn unreachable_destination() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/webhooks/1200/secret-token")
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig`. The store settings are unused because tests
/// inject their store directly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        forward_timeout_secs: 5,
        sweep_interval_secs: None,
        store: StoreConfig::Rest {
            url: "http://127.0.0.1:9".to_string(),
            api_key: "unused".to_string(),
            table: "webhook_logs".to_string(),
        },
    }
}

/// Build the full application router with the given accounts and store.
pub fn build_test_app(accounts: &[(&str, &str)], store: Arc<dyn LogStore>) -> Router {
    let mut registry = AccountRegistry::default();
    for (name, url) in accounts {
        registry.insert(*name, url);
    }

    let state = AppState {
        accounts: Arc::new(registry),
        forwarder: Forwarder::new(reqwest::Client::new()),
        store,
    };

    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    app.oneshot(builder.body(body.into()).unwrap()).await.unwrap()
}

pub async fn post(app: Router, uri: &str, content_type: &str, body: impl Into<Body>) -> Response {
    send(app, Method::POST, uri, Some(content_type), body).await
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, Body::empty()).await
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A small multipart payload shaped like what the macro tool sends.
pub const MULTIPART_TYPE: &str = "multipart/form-data; boundary=----relayboundary";

pub fn multipart_body() -> Vec<u8> {
    concat!(
        "------relayboundary\r\n",
        "Content-Disposition: form-data; name=\"payload_json\"\r\n\r\n",
        "{\"embeds\":[{\"description\":\"Converting balloon\"}]}\r\n",
        "------relayboundary\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"shot.png\"\r\n",
        "Content-Type: image/png\r\n\r\n",
        "\u{89}PNG fake image bytes\r\n",
        "------relayboundary--\r\n",
    )
    .as_bytes()
    .to_vec()
}
