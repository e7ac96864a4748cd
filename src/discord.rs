//! Discord REST client for the sync stage.
//!
//! A single authenticated request lists the most recent messages in a
//! channel:
//!
//! ```text
//! GET {api_base}/channels/{channel_id}/messages?limit={1..=100}
//! Authorization: Bot {token}
//! ```
//!
//! Only the fields the sync stage reads are modelled; everything else in the
//! message payload is ignored. No gateway connection, no pagination.

use log::{debug, info};
use reqwest::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MAX_MESSAGE_LIMIT;

#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("invalid bot token (401 Unauthorized)")]
    Unauthorized,
    #[error("bot lacks permission to read this channel (403 Forbidden)")]
    Forbidden,
    #[error("channel not found (404 Not Found)")]
    ChannelNotFound,
    #[error("Discord API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid token header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// A channel message, reduced to what attachment extraction needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: Option<Author>,
    /// ISO-8601 timestamp of when the message was posted.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub username: Option<String>,
    /// Display name; preferred over `username` when set.
    #[serde(default)]
    pub global_name: Option<String>,
}

impl Author {
    /// Display name, falling back from `global_name` to `username`.
    pub fn display_name(&self) -> Option<&str> {
        [&self.global_name, &self.username]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
}

pub struct DiscordClient {
    client: Client,
    api_base: String,
    auth: HeaderValue,
}

impl DiscordClient {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self, DiscordError> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))?;
        auth.set_sensitive(true);
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// URL of the message-history request, with `limit` clamped to 1-100.
    pub fn messages_url(&self, channel_id: &str, limit: u32) -> String {
        let limit = limit.clamp(1, MAX_MESSAGE_LIMIT);
        format!(
            "{}/channels/{}/messages?limit={}",
            self.api_base, channel_id, limit
        )
    }

    /// Fetch up to `limit` recent messages, newest first as Discord returns them.
    pub async fn fetch_messages(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, DiscordError> {
        let url = self.messages_url(channel_id, limit);
        info!("sync: fetching up to {limit} messages from channel {channel_id}");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .header(
                USER_AGENT,
                concat!("channel-drop/", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await?;

        let status = response.status();
        debug!("sync: GET {url} -> {status}");
        match status {
            StatusCode::OK => {
                let messages: Vec<Message> = response.json().await?;
                info!("sync: fetched {} messages", messages.len());
                Ok(messages)
            }
            StatusCode::UNAUTHORIZED => Err(DiscordError::Unauthorized),
            StatusCode::FORBIDDEN => Err(DiscordError::Forbidden),
            StatusCode::NOT_FOUND => Err(DiscordError::ChannelNotFound),
            other => {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(err) => {
                        debug!("sync: could not read {other} response body: {err}");
                        String::new()
                    }
                };
                Err(DiscordError::Api {
                    status: other.as_u16(),
                    body,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DiscordClient {
        DiscordClient::new(
            "https://discord.com/api/v10/",
            "token",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn messages_url_clamps_limit() {
        let c = client();
        assert_eq!(
            c.messages_url("42", 500),
            "https://discord.com/api/v10/channels/42/messages?limit=100"
        );
        assert_eq!(
            c.messages_url("42", 0),
            "https://discord.com/api/v10/channels/42/messages?limit=1"
        );
        assert_eq!(
            c.messages_url("42", 25),
            "https://discord.com/api/v10/channels/42/messages?limit=25"
        );
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let result = DiscordClient::new("https://x", "bad\ntoken", Duration::from_secs(1));
        assert!(matches!(result, Err(DiscordError::Header(_))));
    }

    #[test]
    fn display_name_prefers_global_name() {
        let author = Author {
            username: Some("alice_99".into()),
            global_name: Some("Alice".into()),
        };
        assert_eq!(author.display_name(), Some("Alice"));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let author = Author {
            username: Some("alice_99".into()),
            global_name: None,
        };
        assert_eq!(author.display_name(), Some("alice_99"));

        let blank_global = Author {
            username: Some("bob".into()),
            global_name: Some(String::new()),
        };
        assert_eq!(blank_global.display_name(), Some("bob"));
        assert_eq!(Author::default().display_name(), None);
    }

    #[test]
    fn message_payload_ignores_unmodelled_fields() {
        let json = r#"[{
            "id": "1",
            "type": 0,
            "content": "here you go",
            "channel_id": "42",
            "author": {"id": "9", "username": "alice", "global_name": null, "avatar": null},
            "timestamp": "2024-01-15T10:30:00.000000+00:00",
            "attachments": [{
                "id": "7",
                "filename": "notes.txt",
                "size": 120,
                "url": "https://cdn.discordapp.com/attachments/42/7/notes.txt",
                "proxy_url": "https://media.discordapp.net/x",
                "content_type": "text/plain; charset=utf-8"
            }],
            "embeds": []
        }, {
            "id": "2",
            "content": "no files"
        }]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].attachments[0].filename.as_deref(), Some("notes.txt"));
        assert_eq!(messages[0].author.as_ref().unwrap().display_name(), Some("alice"));
        assert!(messages[1].attachments.is_empty());
        assert!(messages[1].author.is_none());
    }
}
