use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::info;

use super::{print_json, Context};
use crate::cli::formatters::{format_purchases_table, format_urgent_widget};
use crate::cli::PurchaseCommands;
use influ::db::{self, Purchase};
use influ::error::PanelError;
use influ::reports;
use influ::returns::{self, PurchaseStatus};
use influ::utils::{format_currency, money_string, parse_amount, parse_date};

pub async fn dispatch_purchases(action: PurchaseCommands, ctx: &Context) -> Result<()> {
    match action {
        PurchaseCommands::Add {
            store,
            amount,
            items,
            date,
            window,
        } => {
            let amount = parse_amount(&amount)?;
            let purchase_date = match date {
                Some(raw) => parse_date(&raw)?,
                None => ctx.as_of,
            };
            let window = window.unwrap_or(ctx.config.returns.default_window_days);

            let mut purchase = Purchase::new(&store, purchase_date, window, amount);
            purchase.items_description = items;

            let conn = ctx.open_db()?;
            let id = db::insert_purchase(&conn, &purchase)?;
            purchase.id = Some(id);
            info!("Added purchase #{} from {}", id, purchase.store_name);

            if ctx.json {
                return print_json(&purchase_json(&purchase, ctx.as_of));
            }

            let status = purchase.return_status(ctx.as_of);
            println!(
                "{} Added purchase #{} {} ({}), return by {} ({} days left)",
                "✓".green().bold(),
                id,
                purchase.store_name.bold(),
                format_currency(purchase.amount),
                status.return_deadline.format("%d.%m.%Y"),
                status.days_remaining
            );
            Ok(())
        }

        PurchaseCommands::List => {
            let conn = ctx.open_db()?;
            let mut purchases = db::list_purchases(&conn)?;
            returns::sort_for_listing(&mut purchases, ctx.as_of);

            if ctx.json {
                let rows: Vec<Value> = purchases.iter().map(|p| purchase_json(p, ctx.as_of)).collect();
                return print_json(&Value::Array(rows));
            }

            if purchases.is_empty() {
                println!("{} No purchases found", "ℹ".blue().bold());
                return Ok(());
            }

            println!("{}", format_purchases_table(&purchases, ctx.as_of));
            Ok(())
        }

        PurchaseCommands::Status {
            id,
            status,
            returned_amount,
        } => {
            let new_status: PurchaseStatus = status.parse()?;
            let returned_amount = returned_amount.map(|raw| parse_amount(&raw)).transpose()?;

            let conn = ctx.open_db()?;
            let mut purchase = db::get_purchase(&conn, id)?.ok_or(PanelError::NotFound {
                entity: "purchase",
                id,
            })?;

            let change = purchase.set_status(new_status, ctx.as_of);
            match new_status {
                PurchaseStatus::Kept => purchase.returned_amount = None,
                _ if returned_amount.is_some() => purchase.returned_amount = returned_amount,
                // a full return covers the whole amount unless told otherwise
                PurchaseStatus::Returned
                    if change.from != PurchaseStatus::Returned || purchase.returned_amount.is_none() =>
                {
                    purchase.returned_amount = Some(purchase.amount)
                }
                _ => {}
            }

            db::update_purchase_status(&conn, &purchase)?;
            info!("Purchase #{}: {} -> {}", id, change.from, change.to);

            if ctx.json {
                return print_json(&purchase_json(&purchase, ctx.as_of));
            }

            println!(
                "{} Purchase #{} {}: {} → {}",
                "✓".green().bold(),
                id,
                purchase.store_name.bold(),
                change.from,
                change.to.to_string().bold()
            );
            Ok(())
        }

        PurchaseCommands::Urgent => {
            let conn = ctx.open_db()?;
            let purchases = db::list_purchases(&conn)?;
            let (count, urgent) = reports::urgent_widget(&purchases, ctx.as_of, None);

            if ctx.json {
                let rows: Vec<Value> = urgent
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
                return print_json(&json!({ "count": count, "purchases": rows }));
            }

            print!("{}", format_urgent_widget(count, &urgent));
            Ok(())
        }

        PurchaseCommands::Remove { id } => {
            let conn = ctx.open_db()?;
            db::delete_purchase(&conn, id)?;
            info!("Removed purchase #{}", id);

            if ctx.json {
                return print_json(&json!({ "removed": id }));
            }
            println!("{} Removed purchase #{}", "✓".green().bold(), id);
            Ok(())
        }
    }
}

fn purchase_json(purchase: &Purchase, as_of: NaiveDate) -> Value {
    let status = purchase.return_status(as_of);
    json!({
        "id": purchase.id,
        "store_name": purchase.store_name,
        "items": purchase.items_description,
        "purchase_date": purchase.purchase_date,
        "amount": money_string(purchase.amount),
        "return_window_days": purchase.return_window_days,
        "return_deadline": status.return_deadline,
        "days_remaining": status.days_remaining,
        "urgency": status.urgency,
        "urgent": returns::is_urgent_return(purchase.status, status.days_remaining),
        "status": purchase.status,
        "returned_amount": purchase.returned_amount.map(money_string),
        "returned_at": purchase.returned_at,
    })
}
