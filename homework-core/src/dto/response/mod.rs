//! Homework-statuses response validation
//!
//! The API answers with a JSON object shaped like:
//!
//! ```json
//! {
//!   "homeworks": [{ "homework_name": "...", "status": "approved", ... }],
//!   "current_date": 1581604970
//! }
//! ```
//!
//! Records are listed most recent first. An empty `homeworks` list means
//! nothing changed since the requested `from_date`.

use serde_json::Value;

use crate::error::ValidationError;

/// Key holding the list of review records
pub const HOMEWORKS_FIELD: &str = "homeworks";

/// Key holding the server time to use as the next `from_date`
pub const CURRENT_DATE_FIELD: &str = "current_date";

/// Extracts the review record list from a decoded response
///
/// Checks, in order, that the response is an object, that it has a
/// `homeworks` key, and that the key holds an array. The array is returned
/// as-is and may be empty.
pub fn extract_records(raw: &Value) -> Result<&[Value], ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::NotAMapping)?;

    let homeworks = object
        .get(HOMEWORKS_FIELD)
        .ok_or(ValidationError::MissingField(HOMEWORKS_FIELD))?;

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ValidationError::WrongType(HOMEWORKS_FIELD))
}

/// Server-reported time of the response, if present and an integer
pub fn current_date(raw: &Value) -> Option<i64> {
    raw.get(CURRENT_DATE_FIELD).and_then(Value::as_i64)
}
