//! Watcher configuration
//!
//! Defines the credentials, endpoints and timing of the watcher. Values are
//! collected by the command line parser (flags or environment variables)
//! and checked here before the poll loop may start.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default homework-statuses endpoint
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default pause between two poll cycles, in seconds
pub const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;

/// Default bound on a single HTTP call, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration problems that prevent the watcher from starting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more credentials are absent or empty
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A value is present but unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Watcher configuration
#[derive(Clone)]
pub struct Config {
    /// OAuth token for the homework API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat receiving every notification
    pub telegram_chat_id: String,

    /// Full URL of the homework-statuses endpoint
    pub endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Pause after every poll cycle
    pub retry_period: Duration,

    /// Upper bound for one fetch or one send
    pub request_timeout: Duration,

    /// Optional plain-text log file, written in addition to stderr
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration with default endpoints and timings
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        telegram_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            telegram_chat_id: telegram_chat_id.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            telegram_api_url: homework_client::DEFAULT_TELEGRAM_API_URL.to_string(),
            retry_period: Duration::from_secs(DEFAULT_RETRY_PERIOD_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_file: None,
        }
    }

    /// Validates the configuration
    ///
    /// All missing credentials are reported together, named by their
    /// environment variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = [
            ("PRACTICUM_TOKEN", &self.practicum_token),
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        for (name, url) in [
            ("endpoint", &self.endpoint),
            ("telegram_api_url", &self.telegram_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.retry_period.is_zero() {
            return Err(ConfigError::Invalid(
                "retry_period must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("request_timeout", &self.request_timeout)
            .field("log_file", &self.log_file)
            .finish()
    }
}
