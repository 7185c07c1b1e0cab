//! CSV export of collaborations
//!
//! One row per collaboration with its full breakdown and a running net
//! total, followed by a `TOTAL` row. Sums are kept at full precision and
//! rounded only when written.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

use crate::db::Collaboration;
use crate::reports::income::IncomeTotals;
use crate::tax::TaxBreakdown;
use crate::utils::money_string;

pub const CSV_HEADER: [&str; 13] = [
    "date",
    "brand",
    "billing_type",
    "fiscal",
    "gross",
    "commission",
    "kup",
    "tax_base",
    "tax",
    "social_insurance",
    "health_insurance",
    "net",
    "running_net",
];

/// Column sums for the TOTAL row
#[derive(Debug, Clone, Copy, Default)]
struct ColumnTotals {
    gross: Decimal,
    commission: Decimal,
    kup: Decimal,
    tax_base: Decimal,
    tax: Decimal,
    social_insurance: Decimal,
    health_insurance: Decimal,
    net: Decimal,
}

impl ColumnTotals {
    fn add(&mut self, b: &TaxBreakdown) {
        self.gross = self.gross.saturating_add(b.gross);
        self.commission = self.commission.saturating_add(b.commission);
        self.kup = self.kup.saturating_add(b.kup);
        self.tax_base = self.tax_base.saturating_add(b.tax_base);
        self.tax = self.tax.saturating_add(b.tax);
        self.social_insurance = self.social_insurance.saturating_add(b.social_insurance);
        self.health_insurance = self.health_insurance.saturating_add(b.health_insurance);
        self.net = self.net.saturating_add(b.net);
    }
}

/// Write collaborations as CSV. Rows are written in date order.
///
/// Returns the totals of the exported rows.
pub fn write_collaborations_csv<W: Write>(writer: W, collabs: &[Collaboration]) -> Result<IncomeTotals> {
    let mut ordered: Vec<&Collaboration> = collabs.iter().collect();
    ordered.sort_by(|a, b| a.collab_date.cmp(&b.collab_date).then(a.id.cmp(&b.id)));

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    let mut columns = ColumnTotals::default();
    let mut totals = IncomeTotals::default();

    for collab in ordered {
        let b = collab.breakdown();
        columns.add(&b);
        totals.add(&b);

        csv_writer.write_record([
            collab.collab_date.format("%Y-%m-%d").to_string(),
            collab.brand.clone(),
            collab.billing_type.clone(),
            collab.is_fiscal().to_string(),
            money_string(b.gross),
            money_string(b.commission),
            money_string(b.kup),
            money_string(b.tax_base),
            money_string(b.tax),
            money_string(b.social_insurance),
            money_string(b.health_insurance),
            money_string(b.net),
            money_string(columns.net),
        ])?;
    }

    csv_writer.write_record([
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        String::new(),
        money_string(columns.gross),
        money_string(columns.commission),
        money_string(columns.kup),
        money_string(columns.tax_base),
        money_string(columns.tax),
        money_string(columns.social_insurance),
        money_string(columns.health_insurance),
        money_string(columns.net),
        money_string(columns.net),
    ])?;

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(totals)
}

/// Export to a file
pub fn export_collaborations_csv(path: &Path, collabs: &[Collaboration]) -> Result<IncomeTotals> {
    let file = std::fs::File::create(path).context(format!("Failed to create {:?}", path))?;
    write_collaborations_csv(file, collabs)
}

/// Export to an in-memory string
pub fn collaborations_csv_string(collabs: &[Collaboration]) -> Result<String> {
    let mut buffer = Vec::new();
    write_collaborations_csv(&mut buffer, collabs)?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}
