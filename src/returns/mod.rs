// Returns module - purchase return deadlines, urgency and status transitions

pub mod deadline;
pub mod status;

pub use deadline::{compute_return_status, return_deadline, ReturnStatus, UrgencyLevel, URGENT_WINDOW_DAYS};
pub use status::{next_returned_at, PurchaseStatus, StatusChange};

use chrono::NaiveDate;
use std::cmp::Ordering;

/// Anything with a return window that the tracker can rank.
pub trait Returnable {
    fn status(&self) -> PurchaseStatus;
    fn purchase_date(&self) -> NaiveDate;
    fn return_window_days(&self) -> u32;
    fn returned_at(&self) -> Option<NaiveDate>;
    /// Final tie breaker for stable listings
    fn sort_key(&self) -> Option<i64>;

    fn days_remaining(&self, as_of: NaiveDate) -> i64 {
        compute_return_status(self.purchase_date(), self.return_window_days(), as_of).days_remaining
    }
}

/// Open purchase whose deadline is today or within the next week.
pub fn is_urgent_return(status: PurchaseStatus, days_remaining: i64) -> bool {
    status.is_open() && (0..=URGENT_WINDOW_DAYS).contains(&days_remaining)
}

/// Badge count: open purchases due within the urgent window
pub fn count_urgent_returns<P: Returnable>(purchases: &[P], as_of: NaiveDate) -> usize {
    purchases
        .iter()
        .filter(|p| is_urgent_return(p.status(), p.days_remaining(as_of)))
        .count()
}

/// Open purchases that are urgent as of `as_of`, soonest deadline first
pub fn urgent_returns<P: Returnable>(purchases: &[P], as_of: NaiveDate) -> Vec<&P> {
    let mut urgent: Vec<&P> = purchases
        .iter()
        .filter(|p| is_urgent_return(p.status(), p.days_remaining(as_of)))
        .collect();
    urgent.sort_by(|a, b| compare_for_listing(*a, *b, as_of));
    urgent
}

/// Listing order: open purchases by days remaining (soonest first), then
/// returned ones, most recently returned first.
pub fn sort_for_listing<P: Returnable>(purchases: &mut [P], as_of: NaiveDate) {
    purchases.sort_by(|a, b| compare_for_listing(a, b, as_of));
}

fn compare_for_listing<P: Returnable>(a: &P, b: &P, as_of: NaiveDate) -> Ordering {
    match (a.status().is_open(), b.status().is_open()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a
            .days_remaining(as_of)
            .cmp(&b.days_remaining(as_of))
            .then(a.purchase_date().cmp(&b.purchase_date()))
            .then(a.sort_key().cmp(&b.sort_key())),
        (false, false) => b
            .returned_at()
            .cmp(&a.returned_at())
            .then(b.purchase_date().cmp(&a.purchase_date()))
            .then(a.sort_key().cmp(&b.sort_key())),
    }
}
