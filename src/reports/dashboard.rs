use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{self, FollowerSnapshot, IdeaStatus, Purchase};
use crate::reports::income::{summarize_income, IncomeReport};
use crate::returns::{self, UrgencyLevel};

/// Urgent purchases shown on the dashboard widget
pub const URGENT_WIDGET_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct UrgentReturn {
    pub id: Option<i64>,
    pub store_name: String,
    pub amount: Decimal,
    pub return_deadline: NaiveDate,
    pub days_remaining: i64,
    pub urgency: UrgencyLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformFollowers {
    pub platform: String,
    pub followers: i64,
    pub recorded_on: NaiveDate,
}

/// Everything the dashboard shows, computed for one as-of date
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub income: IncomeReport,
    /// Badge count, may exceed the widget length
    pub urgent_count: usize,
    pub urgent_returns: Vec<UrgentReturn>,
    pub overdue_open: usize,
    pub ideas_by_status: Vec<(IdeaStatus, i64)>,
    pub followers: Vec<PlatformFollowers>,
    pub total_followers: i64,
}

/// Load everything from the database and build the snapshot.
///
/// `year` defaults to the year of `as_of`.
pub fn build_dashboard(conn: &Connection, as_of: NaiveDate, year: Option<i32>) -> Result<Dashboard> {
    let year = year.unwrap_or_else(|| as_of.year());
    let collabs = db::list_collaborations(conn, Some(year))?;
    let purchases = db::list_purchases(conn)?;
    let ideas = db::count_ideas_by_status(conn)?;
    let snapshots = db::latest_follower_snapshots(conn, as_of)?;

    let income = summarize_income(year, &collabs);
    Ok(assemble_dashboard(as_of, income, &purchases, ideas, &snapshots))
}

/// Badge count and the urgent purchases, soonest deadline first, at most `limit` of them
pub fn urgent_widget(
    purchases: &[Purchase],
    as_of: NaiveDate,
    limit: Option<usize>,
) -> (usize, Vec<UrgentReturn>) {
    let urgent = returns::urgent_returns(purchases, as_of);
    let count = urgent.len();

    let shown = urgent
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|p| {
            let status = p.return_status(as_of);
            UrgentReturn {
                id: p.id,
                store_name: p.store_name.clone(),
                amount: p.amount,
                return_deadline: status.return_deadline,
                days_remaining: status.days_remaining,
                urgency: status.urgency,
            }
        })
        .collect();

    (count, shown)
}

/// Pure part of [`build_dashboard`]
pub fn assemble_dashboard(
    as_of: NaiveDate,
    income: IncomeReport,
    purchases: &[Purchase],
    ideas_by_status: Vec<(IdeaStatus, i64)>,
    snapshots: &[FollowerSnapshot],
) -> Dashboard {
    let (urgent_count, urgent_returns) = urgent_widget(purchases, as_of, Some(URGENT_WIDGET_LIMIT));

    let overdue_open = purchases
        .iter()
        .filter(|p| p.status.is_open() && p.return_status(as_of).days_remaining < 0)
        .count();

    let followers: Vec<PlatformFollowers> = snapshots
        .iter()
        .map(|s| PlatformFollowers {
            platform: s.platform.display_name().to_string(),
            followers: s.followers,
            recorded_on: s.recorded_on,
        })
        .collect();
    let total_followers = db::total_followers(followers.iter().map(|f| f.followers));

    Dashboard {
        as_of,
        income,
        urgent_count,
        urgent_returns,
        overdue_open,
        ideas_by_status,
        followers,
        total_followers,
    }
}
