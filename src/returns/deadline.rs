use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Days left at or below which an open purchase counts as urgent
pub const URGENT_WINDOW_DAYS: i64 = 7;

/// How close a purchase is to its return deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Overdue,
    Today,
    Urgent,
    Soon,
    Ok,
}

impl UrgencyLevel {
    /// First match wins: <0 overdue, 0 today, 1..=3 urgent, 4..=7 soon, else ok
    pub fn from_days_remaining(days_remaining: i64) -> Self {
        match days_remaining {
            d if d < 0 => UrgencyLevel::Overdue,
            0 => UrgencyLevel::Today,
            1..=3 => UrgencyLevel::Urgent,
            4..=7 => UrgencyLevel::Soon,
            _ => UrgencyLevel::Ok,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Overdue => "overdue",
            UrgencyLevel::Today => "today",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Soon => "soon",
            UrgencyLevel::Ok => "ok",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deadline position of a purchase relative to an as-of date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReturnStatus {
    pub return_deadline: NaiveDate,
    pub days_remaining: i64,
    pub urgency: UrgencyLevel,
}

/// Last day a purchase can be returned (calendar-day addition)
pub fn return_deadline(purchase_date: NaiveDate, return_window_days: u32) -> NaiveDate {
    purchase_date
        .checked_add_days(Days::new(u64::from(return_window_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Compute deadline, days remaining and urgency. `as_of` is the caller's "today".
pub fn compute_return_status(
    purchase_date: NaiveDate,
    return_window_days: u32,
    as_of: NaiveDate,
) -> ReturnStatus {
    let return_deadline = return_deadline(purchase_date, return_window_days);
    let days_remaining = return_deadline.signed_duration_since(as_of).num_days();

    ReturnStatus {
        return_deadline,
        days_remaining,
        urgency: UrgencyLevel::from_days_remaining(days_remaining),
    }
}
