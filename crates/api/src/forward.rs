//! Outbound client that relays payloads to destination webhooks.
//!
//! [`Forwarder`] posts the inbound body verbatim to `<destination>?wait=true`
//! and decodes the message object the destination echoes back. There is no
//! retry: the destination may already have accepted a message when an error
//! surfaces, so replaying it could post twice.

use axum::body::Bytes;
use axum::http::HeaderValue;
use hookrelay_core::accounts::with_wait_flag;
use hookrelay_core::discord::DiscordMessage;
use reqwest::header::CONTENT_TYPE;

/// Error type for forwarding failures.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The destination returned a non-2xx status code.
    #[error("Destination returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The destination accepted the payload but its reply was not a message
    /// object.
    #[error("Destination reply is not a message object: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ForwardError {
    /// Whether the destination may already hold the message.
    pub fn after_delivery(&self) -> bool {
        matches!(self, ForwardError::Decode(_))
    }
}

/// Forwards payloads to destination webhooks.
///
/// Cloning is cheap: the inner [`reqwest::Client`] is reference counted.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    /// Create a forwarder reusing an existing [`reqwest::Client`].
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST `body` to `destination` with `wait=true` and decode the reply.
    ///
    /// `content_type` is passed through untouched; when the inbound request
    /// had none, none is sent.
    pub async fn forward(
        &self,
        destination: &str,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<DiscordMessage, ForwardError> {
        let mut request = self.client.post(with_wait_flag(destination)).body(body);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ForwardError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
