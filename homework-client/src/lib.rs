//! Homework HTTP Clients
//!
//! Type-safe HTTP clients used by the homework watcher:
//! - [`PracticumClient`] fetches review statuses from the homework API
//! - [`TelegramClient`] delivers text messages to a fixed Telegram chat
//!
//! Neither client retries. Callers decide when to try again.
//!
//! # Example
//!
//! ```no_run
//! use homework_client::{PracticumClient, TelegramClient};
//!
//! #[tokio::main]
//! async fn main() -> homework_client::Result<()> {
//!     let homework = PracticumClient::new(
//!         "https://practicum.yandex.ru/api/user_api/homework_statuses/",
//!         "practicum-token",
//!     );
//!     let telegram = TelegramClient::new("bot-token", "123456");
//!
//!     let response = homework.fetch_statuses(0).await?;
//!     telegram.send_message(&response.to_string()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod homeworks;
mod telegram;

// Re-export commonly used types
pub use error::{ClientError, MAX_BODY_CHARS, Result};
pub use telegram::{DEFAULT_TELEGRAM_API_URL, MAX_MESSAGE_CHARS, TelegramClient};

use std::fmt;

use reqwest::Client;

/// HTTP client for the homework-statuses endpoint
#[derive(Clone)]
pub struct PracticumClient {
    /// Full URL of the homework-statuses endpoint
    endpoint: String,
    /// OAuth token sent in the `Authorization` header
    token: String,
    /// HTTP client instance
    client: Client,
}

impl PracticumClient {
    /// Create a new homework API client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the homework-statuses endpoint
    /// * `token` - OAuth token of the student
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(endpoint, token, Client::new())
    }

    /// Create a new homework API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use homework_client::PracticumClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = PracticumClient::with_client("http://localhost:8080/statuses/", "token", http_client);
    /// ```
    pub fn with_client(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client,
        }
    }
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let client = PracticumClient::new("http://localhost:8080/statuses/", "secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
