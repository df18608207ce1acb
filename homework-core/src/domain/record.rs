//! Review record domain type

use serde_json::Value;

use crate::domain::status::HomeworkStatus;
use crate::error::FormatError;

/// Name of the homework field in a response record
pub const NAME_FIELD: &str = "homework_name";

/// Name of the status field in a response record
pub const STATUS_FIELD: &str = "status";

/// One homework review, taken from an element of the `homeworks` list
///
/// The status is stored already resolved against the catalog, so a
/// `ReviewRecord` always carries a known, non-empty status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub name: String,
    pub status: HomeworkStatus,
}

impl ReviewRecord {
    pub fn new(name: impl Into<String>, status: HomeworkStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    /// Builds a record from one raw element of the `homeworks` list
    ///
    /// Other fields of the element (id, reviewer comment, dates) are ignored.
    ///
    /// # Errors
    /// - `MalformedRecord` when the name or status is missing or not a string
    /// - `UnknownStatus` when the status is empty or not in the catalog
    pub fn from_value(raw: &Value) -> Result<Self, FormatError> {
        let name = raw
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .ok_or(FormatError::MalformedRecord(NAME_FIELD))?;

        let code = raw
            .get(STATUS_FIELD)
            .and_then(Value::as_str)
            .ok_or(FormatError::MalformedRecord(STATUS_FIELD))?;

        Ok(Self::new(name, code.parse()?))
    }
}
