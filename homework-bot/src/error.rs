//! Errors a poll cycle can recover from

use homework_client::ClientError;
use homework_core::{FormatError, ValidationError};
use thiserror::Error;

/// Failure of one poll cycle
///
/// Every variant is recoverable: the loop logs it, reports it to the chat
/// and tries again after the retry period.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] ClientError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CycleError {
    /// Stage of the cycle that failed, for log fields
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Validation(_) => "validate",
            Self::Format(_) => "format",
        }
    }
}
