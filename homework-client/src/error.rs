//! Error types for the homework and Telegram clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Longest response body kept in an `UnexpectedStatus` error
pub const MAX_BODY_CHARS: usize = 512;

/// Errors that can occur when talking to the homework API or Telegram
#[derive(Debug, Error)]
pub enum ClientError {
    /// The homework endpoint could not be reached
    #[error("homework endpoint unreachable")]
    EndpointUnreachable(#[source] reqwest::Error),

    /// The homework API answered with something other than 200 OK
    #[error("homework API returned status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, if any, cut to `MAX_BODY_CHARS`
        message: String,
    },

    /// The homework API body is not valid JSON
    #[error("malformed homework API response: {0}")]
    MalformedResponse(String),

    /// A Telegram message could not be delivered
    #[error("failed to deliver Telegram message: {0}")]
    DeliveryFailed(String),
}

impl ClientError {
    /// Create an unexpected-status error from status code and body
    ///
    /// Bodies longer than `MAX_BODY_CHARS` characters are cut and end in `…`.
    pub fn unexpected_status(status: u16, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if let Some((cut, _)) = message.char_indices().nth(MAX_BODY_CHARS) {
            message.truncate(cut);
            message.push('…');
        }
        Self::UnexpectedStatus { status, message }
    }

    /// Check if the homework API rejected the credentials (401/403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status: 401 | 403, .. })
    }
}
