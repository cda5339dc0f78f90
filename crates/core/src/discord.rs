//! The message object Discord echoes back from `POST <webhook>?wait=true`,
//! and the summary extracted from it for the relay log.
//!
//! Only the fields the summary needs are modelled. Every collection is
//! optional because Discord (and anything impersonating it) may omit it or
//! send `null`.

use serde::{Deserialize, Serialize};

/// Status used when the first embed has neither description nor title.
pub const DEFAULT_STATUS: &str = "Update";

/// Location used when no embed field matches [`LOCATION_FIELD_MARKERS`].
pub const DEFAULT_LOCATION: &str = "Unknown";

/// Substrings (case-sensitive) that mark an embed field as the location.
pub const LOCATION_FIELD_MARKERS: [&str; 2] = ["Location", "Field"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordMessage {
    pub attachments: Option<Vec<Attachment>>,
    pub embeds: Option<Vec<Embed>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Option<Vec<EmbedField>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// What gets logged about one forwarded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub screenshot_url: Option<String>,
    pub status: String,
    pub location: String,
}

impl DiscordMessage {
    /// Extract the screenshot URL, status and location.
    ///
    /// - `screenshot_url`: URL of the first attachment.
    /// - `status`: first embed's description, then its title, then
    ///   [`DEFAULT_STATUS`]. Empty strings are skipped.
    /// - `location`: value of the first field of the first embed whose name
    ///   contains one of [`LOCATION_FIELD_MARKERS`], else [`DEFAULT_LOCATION`].
    pub fn summarize(&self) -> MessageSummary {
        let screenshot_url = self
            .attachments
            .as_deref()
            .and_then(|attachments| attachments.first())
            .and_then(|attachment| attachment.url.clone());

        let embed = self.embeds.as_deref().and_then(|embeds| embeds.first());

        let status = embed
            .and_then(|e| non_empty(&e.description).or_else(|| non_empty(&e.title)))
            .unwrap_or(DEFAULT_STATUS)
            .to_string();

        let location = embed
            .and_then(|e| e.fields.as_deref())
            .and_then(|fields| fields.iter().find(|f| is_location_field(&f.name)))
            .map(|f| f.value.clone())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        MessageSummary {
            screenshot_url,
            status,
            location,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn is_location_field(name: &str) -> bool {
    LOCATION_FIELD_MARKERS
        .iter()
        .any(|marker| name.contains(*marker))
}
