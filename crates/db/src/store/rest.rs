//! [`LogStore`] backed by a hosted PostgREST endpoint (e.g. Supabase).
//!
//! Rows are written with `POST /rest/v1/<table>` and pruned with
//! `DELETE /rest/v1/<table>?created_at=lt.<timestamp>`. Every request carries
//! the project key both as `apikey` and as a bearer token.

use async_trait::async_trait;
use chrono::SecondsFormat;
use hookrelay_core::types::Timestamp;

use super::{LogStore, StoreError};
use crate::models::log_entry::{LogEntry, NewLogEntry};

pub struct RestLogStore {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl RestLogStore {
    /// Create a store for `table` under the project at `base_url`.
    ///
    /// * `base_url` - Project URL, e.g. `https://abc.supabase.co`.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        table: &str,
    ) -> Self {
        Self {
            client,
            table_url: table_url(base_url, table),
            api_key: api_key.into(),
        }
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Return the response unchanged on 2xx, or a [`StoreError::HttpStatus`]
    /// with the body text otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl LogStore for RestLogStore {
    async fn insert(&self, entry: &NewLogEntry) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=minimal")
            .json(&[entry])
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        let response = self
            .authorized(self.client.delete(&self.table_url))
            .query(&[
                ("created_at", created_before_filter(cutoff)),
                ("select", "id".to_string()),
            ])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        // Only ids are selected back; the count is all that matters.
        let deleted: Vec<serde_json::Value> =
            Self::ensure_success(response).await?.json().await?;
        Ok(deleted.len() as u64)
    }

    async fn recent(
        &self,
        account: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc,id.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(account) = account {
            params.push(("account_name", format!("eq.{account}")));
        }

        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&params)
            .send()
            .await?;

        Ok(Self::ensure_success(response).await?.json().await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}

fn table_url(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

/// PostgREST filter value selecting rows created before `cutoff`.
fn created_before_filter(cutoff: Timestamp) -> String {
    format!("lt.{}", cutoff.to_rfc3339_opts(SecondsFormat::Millis, true))
}
