use axum::http::header::ALLOW;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use hookrelay_core::error::CoreError;
use hookrelay_db::store::StoreError;

use crate::forward::ForwardError;

/// Body of a 400 for an unknown or unconfigured account.
pub const UNKNOWN_ACCOUNT_BODY: &str = "Unknown account or missing webhook config.";

/// Body of a 405.
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";

/// Body of every 500. Causes are logged, never returned to the caller.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] with plain-text bodies, which is what the
/// automation tools posting to the relay expect to see.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `hookrelay_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The account parameter or path segment could not be read.
    #[error("Unreadable account: {0}")]
    UnreadableAccount(String),

    /// The relay endpoint only accepts POST.
    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    /// Forwarding to the destination webhook failed.
    #[error("Forwarding failed: {0}")]
    Forward(#[from] ForwardError),

    /// Writing to or pruning the log store failed.
    #[error("Log store failed: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Core(CoreError::UnknownAccount(_) | CoreError::UnconfiguredAccount(_))
            | AppError::UnreadableAccount(_) => {
                (StatusCode::BAD_REQUEST, UNKNOWN_ACCOUNT_BODY).into_response()
            }
            AppError::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(ALLOW, "POST")],
                METHOD_NOT_ALLOWED_BODY,
            )
                .into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()).into_response(),
            AppError::Forward(err) => {
                tracing::error!(
                    error = %err,
                    delivered = err.after_delivery(),
                    "Error forwarding webhook"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
            AppError::Store(err) => {
                // The destination already has the message at this point.
                tracing::error!(error = %err, delivered = true, "Error logging webhook");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}
