//! Error types for response validation and status formatting

use thiserror::Error;

/// The response did not have the shape of a homework-statuses answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The decoded body is not a JSON object
    #[error("response is not a JSON object")]
    NotAMapping,

    /// A required key is absent
    #[error("response has no `{0}` field")]
    MissingField(&'static str),

    /// A key is present but holds the wrong JSON type
    #[error("response field `{0}` has an unexpected type")]
    WrongType(&'static str),
}

/// A single review record could not be turned into a notification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A required record field is absent or not a string
    #[error("review record has no usable `{0}` field")]
    MalformedRecord(&'static str),

    /// The status code is empty or not in the catalog
    #[error("unknown review status: {0:?}")]
    UnknownStatus(String),
}
