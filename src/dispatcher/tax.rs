use anyhow::Result;
use serde_json::json;

use super::{breakdown_json, print_json, Context};
use crate::cli::formatters::{format_breakdown_table, format_comparison_table};
use crate::cli::TaxCommands;
use influ::tax::{get_breakdown, BillingType};
use influ::utils::{money_string, parse_amount};

pub async fn dispatch_tax(action: TaxCommands, ctx: &Context) -> Result<()> {
    match action {
        TaxCommands::Calc { gross, billing_type } => {
            let gross = parse_amount(&gross)?;
            let billing: BillingType = billing_type.parse()?;
            let breakdown = get_breakdown(gross, billing);

            if ctx.json {
                return print_json(&json!({
                    "billing_type": billing.as_str(),
                    "fiscal": billing.is_fiscal(),
                    "breakdown": breakdown_json(&breakdown),
                }));
            }

            print!("{}", format_breakdown_table(billing, &breakdown));
            Ok(())
        }

        TaxCommands::Compare { gross } => {
            let gross = parse_amount(&gross)?;
            let rows: Vec<_> = BillingType::ALL
                .iter()
                .map(|billing| (*billing, get_breakdown(gross, *billing)))
                .collect();

            if ctx.json {
                let types: Vec<_> = rows
                    .iter()
                    .map(|(billing, breakdown)| {
                        json!({
                            "billing_type": billing.as_str(),
                            "fiscal": billing.is_fiscal(),
                            "breakdown": breakdown_json(breakdown),
                        })
                    })
                    .collect();
                return print_json(&json!({
                    "gross": money_string(gross),
                    "types": types,
                }));
            }

            print!("{}", format_comparison_table(gross, &rows));
            Ok(())
        }
    }
}
