use anyhow::Result;
use chrono::Datelike;
use itertools::Itertools;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::db::{self, Collaboration};
use crate::tax::TaxBreakdown;
use crate::utils::month_name;

/// Summed breakdowns for a group of collaborations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IncomeTotals {
    pub count: usize,
    pub gross: Decimal,
    pub commission: Decimal,
    pub tax: Decimal,
    /// ZUS + health on employment contracts
    pub contributions: Decimal,
    pub net: Decimal,
}

impl IncomeTotals {
    /// Sums saturate at the `Decimal` range so one oversized row cannot abort a report.
    pub fn add(&mut self, breakdown: &TaxBreakdown) {
        self.count += 1;
        self.gross = self.gross.saturating_add(breakdown.gross);
        self.commission = self.commission.saturating_add(breakdown.commission);
        self.tax = self.tax.saturating_add(breakdown.tax);
        self.contributions = self
            .contributions
            .saturating_add(breakdown.social_insurance.saturating_add(breakdown.health_insurance));
        self.net = self.net.saturating_add(breakdown.net);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyIncome {
    pub month: u32,
    pub month_name: &'static str,
    pub totals: IncomeTotals,
}

/// Yearly income summary
#[derive(Debug, Clone, Serialize)]
pub struct IncomeReport {
    pub year: i32,
    /// Months with at least one collaboration, in calendar order
    pub months: Vec<MonthlyIncome>,
    /// Keyed by raw billing tag so unrecognized tags still show up
    pub by_billing_type: BTreeMap<String, IncomeTotals>,
    /// Declared income (everything except cash)
    pub fiscal: IncomeTotals,
    /// Cash, tracked privately
    pub cash: IncomeTotals,
    pub total: IncomeTotals,
    /// Net of collaborations not yet paid
    pub unpaid_net: Decimal,
    /// Rows whose billing tag this build does not recognize
    pub unknown_billing_rows: usize,
}

/// Load a year's collaborations and summarize them
pub fn calculate_income_report(conn: &Connection, year: i32) -> Result<IncomeReport> {
    let collabs = db::list_collaborations(conn, Some(year))?;
    Ok(summarize_income(year, &collabs))
}

/// Summarize collaborations of one year. Rows from other years are ignored.
///
/// Each row is recomputed from gross with the tax engine rather than
/// trusting the stored net.
pub fn summarize_income(year: i32, collabs: &[Collaboration]) -> IncomeReport {
    let mut report = IncomeReport {
        year,
        months: Vec::new(),
        by_billing_type: BTreeMap::new(),
        fiscal: IncomeTotals::default(),
        cash: IncomeTotals::default(),
        total: IncomeTotals::default(),
        unpaid_net: Decimal::ZERO,
        unknown_billing_rows: 0,
    };

    let in_year = collabs.iter().filter(|c| c.collab_date.year() == year);
    let by_month = in_year.into_group_map_by(|c| c.collab_date.month());

    for month in by_month.keys().copied().sorted() {
        let mut totals = IncomeTotals::default();

        for collab in &by_month[&month] {
            let breakdown = collab.breakdown();

            if collab.billing().is_none() {
                warn!(
                    "Collaboration #{} has unknown billing type '{}', counted without deductions",
                    collab.id.unwrap_or_default(),
                    collab.billing_type
                );
                report.unknown_billing_rows += 1;
            }

            totals.add(&breakdown);
            report.total.add(&breakdown);
            report
                .by_billing_type
                .entry(collab.billing_type.clone())
                .or_default()
                .add(&breakdown);

            if collab.is_fiscal() {
                report.fiscal.add(&breakdown);
            } else {
                report.cash.add(&breakdown);
            }

            if !collab.is_paid {
                report.unpaid_net = report.unpaid_net.saturating_add(breakdown.net);
            }
        }

        report.months.push(MonthlyIncome {
            month,
            month_name: month_name(month),
            totals,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::BillingType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn collab(id: i64, date: (i32, u32, u32), gross: Decimal, billing: BillingType) -> Collaboration {
        let mut c = Collaboration::new(
            "Brand",
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            gross,
            billing,
        );
        c.id = Some(id);
        c
    }

    #[test]
    fn test_monthly_and_yearly_sums() {
        let mut paid = collab(1, (2024, 1, 10), dec!(1000), BillingType::Umowa50);
        paid.is_paid = true;
        let collabs = vec![
            paid,
            collab(2, (2024, 1, 20), dec!(1000), BillingType::Useme20),
            collab(3, (2024, 3, 5), dec!(500), BillingType::Gotowka),
            collab(4, (2023, 12, 31), dec!(9999), BillingType::Umowa20),
        ];

        let report = summarize_income(2024, &collabs);

        assert_eq!(report.months.len(), 2);
        assert_eq!(report.months[0].month, 1);
        assert_eq!(report.months[0].month_name, "Styczeń");
        assert_eq!(report.months[0].totals.net, dec!(940) + dec!(826));
        assert_eq!(report.months[1].totals.net, dec!(500));

        assert_eq!(report.total.count, 3);
        assert_eq!(report.total.gross, dec!(2500));
        assert_eq!(report.fiscal.net, dec!(1766));
        assert_eq!(report.cash.net, dec!(500));
        assert_eq!(report.unpaid_net, dec!(1326));
        assert_eq!(report.by_billing_type["useme_20"].commission, dec!(78));
    }

    #[test]
    fn test_unknown_tags_are_counted_and_kept_at_gross() {
        let mut odd = collab(1, (2024, 5, 1), dec!(700), BillingType::Umowa50);
        odd.billing_type = "barter".to_string();

        let report = summarize_income(2024, &[odd]);

        assert_eq!(report.unknown_billing_rows, 1);
        assert_eq!(report.by_billing_type["barter"].net, dec!(700));
        assert_eq!(report.fiscal.net, dec!(700));
    }

    #[test]
    fn test_empty_year() {
        let report = summarize_income(2024, &[]);
        assert!(report.months.is_empty());
        assert_eq!(report.total, IncomeTotals::default());
    }

    #[test]
    fn test_oversized_rows_saturate_instead_of_panicking() {
        let collabs = vec![
            collab(1, (2024, 2, 1), Decimal::MAX, BillingType::Gotowka),
            collab(2, (2024, 2, 2), Decimal::MAX, BillingType::Gotowka),
        ];

        let report = summarize_income(2024, &collabs);

        assert_eq!(report.total.count, 2);
        assert_eq!(report.total.gross, Decimal::MAX);
        assert_eq!(report.cash.net, Decimal::MAX);
        assert_eq!(report.unpaid_net, Decimal::MAX);
    }
}
