//! Telegram Bot API client
//!
//! Only `sendMessage` is used. Both status changes and failure reports go to
//! the same chat.

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Public Telegram Bot API base URL
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Longest text `sendMessage` accepts, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Request body of `sendMessage`
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Client that sends text messages to one Telegram chat
#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    bot_token: String,
    chat_id: String,
    client: Client,
}

impl TelegramClient {
    /// Create a client for the public Bot API
    ///
    /// # Arguments
    /// * `bot_token` - Token issued by BotFather
    /// * `chat_id` - Destination chat for every message
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_TELEGRAM_API_URL, bot_token, chat_id, Client::new())
    }

    /// Create a client against a custom Bot API server
    ///
    /// Used for self-hosted Bot API servers and for tests.
    pub fn with_base_url(
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client,
        }
    }

    /// Destination chat identifier
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Send a text message to the configured chat
    ///
    /// # Errors
    /// Returns `DeliveryFailed` on transport errors, non-2xx statuses and
    /// `"ok": false` answers. The bot token never appears in the error text.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(transport_failure)?;

        let answer = serde_json::from_str::<ApiResponse>(&body).ok();

        if !status.is_success() || !answer.as_ref().is_some_and(|a| a.ok) {
            let description = answer
                .and_then(|a| a.description)
                .unwrap_or_else(|| format!("status {}", status.as_u16()));
            return Err(ClientError::DeliveryFailed(description));
        }

        debug!("Message delivered to chat {}", self.chat_id);
        Ok(())
    }
}

/// Describes a transport error with its causes, without the request URL
fn transport_failure(e: reqwest::Error) -> ClientError {
    let e = e.without_url();
    let mut description = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    ClientError::DeliveryFailed(description)
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
