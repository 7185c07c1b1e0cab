use anyhow::Result;
use serde_json::{json, Value};

use super::{print_json, totals_json, Context};
use crate::cli::formatters::format_dashboard;
use influ::reports;
use influ::utils::money_string;

pub async fn dispatch_dashboard(year: Option<i32>, ctx: &Context) -> Result<()> {
    let conn = ctx.open_db()?;
    let dashboard = reports::build_dashboard(&conn, ctx.as_of, year)?;

    if !ctx.json {
        print!("{}", format_dashboard(&dashboard));
        return Ok(());
    }

    let urgent: Vec<Value> = dashboard
        .urgent_returns
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "store_name": u.store_name,
                "amount": money_string(u.amount),
                "return_deadline": u.return_deadline,
                "days_remaining": u.days_remaining,
                "urgency": u.urgency,
            })
        })
        .collect();
    let ideas: serde_json::Map<String, Value> = dashboard
        .ideas_by_status
        .iter()
        .map(|(status, count)| (status.as_str().to_string(), json!(count)))
        .collect();

    print_json(&json!({
        "as_of": dashboard.as_of,
        "income": {
            "year": dashboard.income.year,
            "fiscal": totals_json(&dashboard.income.fiscal),
            "cash": totals_json(&dashboard.income.cash),
            "total": totals_json(&dashboard.income.total),
            "unpaid_net": money_string(dashboard.income.unpaid_net),
        },
        "urgent_count": dashboard.urgent_count,
        "urgent_returns": urgent,
        "overdue_open": dashboard.overdue_open,
        "ideas_by_status": ideas,
        "followers": dashboard.followers,
        "total_followers": dashboard.total_followers,
    }))
}
