use anyhow::Result;
use colored::Colorize;
use serde_json::{json, Map, Value};

use super::{print_json, totals_json, Context};
use crate::cli::formatters::format_income_report;
use crate::cli::IncomeCommands;
use influ::reports;
use influ::utils::money_string;

pub async fn dispatch_income(action: IncomeCommands, ctx: &Context) -> Result<()> {
    match action {
        IncomeCommands::Summary { year } => {
            let conn = ctx.open_db()?;
            let report = reports::calculate_income_report(&conn, year)?;

            if ctx.json {
                let months: Vec<Value> = report
                    .months
                    .iter()
                    .map(|m| {
                        json!({
                            "month": m.month,
                            "name": m.month_name,
                            "totals": totals_json(&m.totals),
                        })
                    })
                    .collect();
                let by_type: Map<String, Value> = report
                    .by_billing_type
                    .iter()
                    .map(|(tag, totals)| (tag.clone(), totals_json(totals)))
                    .collect();

                return print_json(&json!({
                    "year": report.year,
                    "months": months,
                    "by_billing_type": by_type,
                    "fiscal": totals_json(&report.fiscal),
                    "cash": totals_json(&report.cash),
                    "total": totals_json(&report.total),
                    "unpaid_net": money_string(report.unpaid_net),
                    "unknown_billing_rows": report.unknown_billing_rows,
                }));
            }

            if report.months.is_empty() {
                println!("{} No collaborations in {}", "ℹ".blue().bold(), year);
                return Ok(());
            }

            print!("{}", format_income_report(&report));
            Ok(())
        }
    }
}
