use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PanelError;

/// Whether a purchase was kept or sent back
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Kept,
    Partial,
    Returned,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Kept => "kept",
            PurchaseStatus::Partial => "partial",
            PurchaseStatus::Returned => "returned",
        }
    }

    /// Still waiting on a return decision (kept or partially returned)
    pub fn is_open(&self) -> bool {
        !matches!(self, PurchaseStatus::Returned)
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseStatus {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kept" | "zatrzymane" => Ok(PurchaseStatus::Kept),
            "partial" | "czesciowo" => Ok(PurchaseStatus::Partial),
            "returned" | "zwrocone" => Ok(PurchaseStatus::Returned),
            other => Err(PanelError::ParseError(format!(
                "unknown purchase status '{}' (expected kept, partial or returned)",
                other
            ))),
        }
    }
}

/// Result of a status change, for logging and confirmation output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: PurchaseStatus,
    pub to: PurchaseStatus,
    pub returned_at: Option<NaiveDate>,
}

/// Next `returned_at` for a status change.
///
/// Entering `returned` stamps `as_of`, staying `returned` keeps the original
/// stamp, leaving `returned` clears it. `partial` never stamps.
pub fn next_returned_at(
    from: PurchaseStatus,
    to: PurchaseStatus,
    returned_at: Option<NaiveDate>,
    as_of: NaiveDate,
) -> Option<NaiveDate> {
    match (from, to) {
        (PurchaseStatus::Returned, PurchaseStatus::Returned) => returned_at.or(Some(as_of)),
        (_, PurchaseStatus::Returned) => Some(as_of),
        (PurchaseStatus::Returned, _) => None,
        _ => returned_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_entering_returned_stamps_as_of() {
        let today = date(2024, 3, 1);
        assert_eq!(
            next_returned_at(PurchaseStatus::Kept, PurchaseStatus::Returned, None, today),
            Some(today)
        );
        assert_eq!(
            next_returned_at(PurchaseStatus::Partial, PurchaseStatus::Returned, None, today),
            Some(today)
        );
    }

    #[test]
    fn test_repeated_returned_keeps_first_stamp() {
        let first = date(2024, 3, 1);
        assert_eq!(
            next_returned_at(
                PurchaseStatus::Returned,
                PurchaseStatus::Returned,
                Some(first),
                date(2024, 3, 9)
            ),
            Some(first)
        );
    }

    #[test]
    fn test_leaving_returned_clears_stamp() {
        let stamp = Some(date(2024, 3, 1));
        let today = date(2024, 3, 2);
        assert_eq!(
            next_returned_at(PurchaseStatus::Returned, PurchaseStatus::Kept, stamp, today),
            None
        );
        assert_eq!(
            next_returned_at(PurchaseStatus::Returned, PurchaseStatus::Partial, stamp, today),
            None
        );
    }

    #[test]
    fn test_partial_does_not_touch_stamp() {
        let today = date(2024, 3, 2);
        assert_eq!(
            next_returned_at(PurchaseStatus::Kept, PurchaseStatus::Partial, None, today),
            None
        );
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("RETURNED".parse::<PurchaseStatus>().unwrap(), PurchaseStatus::Returned);
        assert!("lost".parse::<PurchaseStatus>().is_err());
        assert!(PurchaseStatus::Partial.is_open());
        assert!(!PurchaseStatus::Returned.is_open());
    }
}
