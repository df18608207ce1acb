//! Review status catalog
//!
//! The homework API reports one of three status codes. Each maps to a fixed
//! verdict sentence shown to the student.

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// Review status of a submitted homework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Every status the catalog knows about
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Looks up a status by its wire code
    ///
    /// Matching is exact: no trimming, no case folding. An empty code is
    /// never a member of the catalog.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Wire code as sent by the homework API
    pub fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict for this status
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = FormatError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::from_code(code).ok_or_else(|| FormatError::UnknownStatus(code.to_string()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_catalog() {
        for status in HomeworkStatus::ALL {
            assert_eq!(HomeworkStatus::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        for code in ["", "APPROVED", " approved", "pending", "approved "] {
            assert_eq!(
                code.parse::<HomeworkStatus>(),
                Err(FormatError::UnknownStatus(code.to_string()))
            );
        }
    }

    #[test]
    fn test_verdicts_are_distinct() {
        let verdicts: std::collections::HashSet<_> =
            HomeworkStatus::ALL.iter().map(|s| s.verdict()).collect();
        assert_eq!(verdicts.len(), HomeworkStatus::ALL.len());
    }
}
