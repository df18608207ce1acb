//! Homework statuses repository

use async_trait::async_trait;
use homework_client::{ClientError, PracticumClient};
use serde_json::Value;

/// Source of raw homework-statuses responses
#[async_trait]
pub trait HomeworkRepository: Send + Sync {
    /// Fetches reviews changed since `from_date`
    ///
    /// # Arguments
    /// * `from_date` - Unix timestamp lower bound of the query window
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, ClientError>;
}

#[async_trait]
impl HomeworkRepository for PracticumClient {
    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, ClientError> {
        PracticumClient::fetch_statuses(self, from_date).await
    }
}
