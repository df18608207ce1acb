//! Status formatting
//!
//! Builds the one-line notification sent when a review status changes.

use serde_json::Value;

use crate::domain::record::ReviewRecord;
use crate::error::FormatError;

/// Renders the notification for a review record
///
/// The line names the homework first, then states the verdict.
pub fn format_status(record: &ReviewRecord) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        record.name,
        record.status.verdict()
    )
}

/// Parses a raw `homeworks` element and renders its notification
pub fn parse_status(raw: &Value) -> Result<String, FormatError> {
    ReviewRecord::from_value(raw).map(|record| format_status(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::HomeworkStatus;
    use serde_json::json;

    #[test]
    fn test_approved_message() {
        let raw = json!({ "homework_name": "proj1", "status": "approved" });
        assert_eq!(
            parse_status(&raw).unwrap(),
            "Изменился статус проверки работы \"proj1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_every_status_names_homework_and_verdict() {
        for status in HomeworkStatus::ALL {
            let message = format_status(&ReviewRecord::new("hw_bot", status));
            assert!(message.contains("\"hw_bot\""));
            assert!(message.ends_with(status.verdict()));
            assert!(!message.contains('\n'));
        }
    }

    #[test]
    fn test_unknown_status_never_defaults() {
        let raw = json!({ "homework_name": "proj1", "status": "on_hold" });
        assert_eq!(
            parse_status(&raw),
            Err(FormatError::UnknownStatus("on_hold".to_string()))
        );
    }
}
