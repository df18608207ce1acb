//! Homework-statuses endpoint

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

use crate::PracticumClient;
use crate::error::{ClientError, Result};

impl PracticumClient {
    /// Fetch review statuses changed since `from_date`
    ///
    /// Sends `GET <endpoint>?from_date=<from_date>` with an
    /// `Authorization: OAuth <token>` header.
    ///
    /// # Arguments
    /// * `from_date` - Unix timestamp; older reviews are not returned
    ///
    /// # Returns
    /// The decoded JSON body. Its shape is not checked here.
    ///
    /// # Errors
    /// - `EndpointUnreachable` on connection failures and timeouts
    /// - `UnexpectedStatus` for any status other than 200
    /// - `MalformedResponse` when the body is not JSON
    pub async fn fetch_statuses(&self, from_date: i64) -> Result<Value> {
        debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(ClientError::EndpointUnreachable)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::unexpected_status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}
