//! Notification repository

use async_trait::async_trait;
use homework_client::{ClientError, TelegramClient};

/// Delivers text messages to the fixed destination chat
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one message
    ///
    /// An `Err` means the message was not delivered.
    async fn notify(&self, message: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn notify(&self, message: &str) -> Result<(), ClientError> {
        self.send_message(message).await
    }
}
