use anyhow::Result;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::info;

use super::{breakdown_json, print_json, Context};
use crate::cli::formatters::format_collabs_table;
use crate::cli::CollabCommands;
use influ::db::{self, Collaboration, TeamMember};
use influ::error::PanelError;
use influ::reports;
use influ::tax::BillingType;
use influ::utils::{format_currency, money_string, parse_amount, parse_date};

pub async fn dispatch_collabs(action: CollabCommands, ctx: &Context) -> Result<()> {
    match action {
        CollabCommands::Add {
            brand,
            gross,
            billing_type,
            date,
            description,
            paid,
            notes,
            members,
        } => {
            let gross = parse_amount(&gross)?;
            let billing = match billing_type {
                Some(raw) => raw.parse::<BillingType>()?,
                None => ctx.config.collaborations.default_billing_type,
            };
            let collab_date = match date {
                Some(raw) => parse_date(&raw)?,
                None => ctx.as_of,
            };

            let mut collab = Collaboration::new(&brand, collab_date, gross, billing);
            collab.description = description;
            collab.notes = notes;
            collab.is_paid = paid;
            collab.team_members = parse_members(&members)?;

            let mut conn = ctx.open_db()?;
            let id = db::insert_collaboration(&mut conn, &collab)?;
            collab.id = Some(id);

            if ctx.json {
                return print_json(&collab_json(&collab));
            }

            println!(
                "{} Added collaboration #{} {} ({}): net {}",
                "✓".green().bold(),
                id,
                collab.brand.bold(),
                billing.as_str(),
                format_currency(collab.amount_net).green()
            );
            Ok(())
        }

        CollabCommands::List { year } => {
            let conn = ctx.open_db()?;
            let collabs = db::list_collaborations(&conn, year)?;

            if ctx.json {
                let rows: Vec<Value> = collabs.iter().map(collab_json).collect();
                return print_json(&Value::Array(rows));
            }

            if collabs.is_empty() {
                println!("{} No collaborations found", "ℹ".blue().bold());
                return Ok(());
            }

            print!("{}", format_collabs_table(&collabs));
            Ok(())
        }

        CollabCommands::Update {
            id,
            brand,
            gross,
            billing_type,
            date,
            description,
            notes,
            paid,
            unpaid,
            members,
            clear_members,
        } => {
            let mut conn = ctx.open_db()?;
            let mut collab = db::get_collaboration(&conn, id)?.ok_or(PanelError::NotFound {
                entity: "collaboration",
                id,
            })?;

            if let Some(brand) = brand {
                collab.brand = brand;
            }
            if let Some(raw) = gross {
                collab.amount_gross = parse_amount(&raw)?;
            }
            if let Some(raw) = billing_type {
                collab.billing_type = raw.parse::<BillingType>()?.as_str().to_string();
            }
            if let Some(raw) = date {
                collab.collab_date = parse_date(&raw)?;
            }
            if description.is_some() {
                collab.description = description;
            }
            if notes.is_some() {
                collab.notes = notes;
            }
            if paid {
                collab.is_paid = true;
            } else if unpaid {
                collab.is_paid = false;
            }
            if clear_members {
                collab.team_members.clear();
            } else if !members.is_empty() {
                collab.team_members = parse_members(&members)?;
            }

            collab.refresh_net();
            db::update_collaboration(&mut conn, &collab)?;
            info!("Updated collaboration #{}", id);

            if ctx.json {
                return print_json(&collab_json(&collab));
            }

            println!(
                "{} Updated collaboration #{} {}: net {}",
                "✓".green().bold(),
                id,
                collab.brand.bold(),
                format_currency(collab.amount_net).green()
            );
            Ok(())
        }

        CollabCommands::Remove { id } => {
            let conn = ctx.open_db()?;
            db::delete_collaboration(&conn, id)?;
            info!("Removed collaboration #{}", id);

            if ctx.json {
                return print_json(&json!({ "removed": id }));
            }
            println!("{} Removed collaboration #{}", "✓".green().bold(), id);
            Ok(())
        }

        CollabCommands::Export { year, output } => {
            let conn = ctx.open_db()?;
            let collabs = db::list_collaborations(&conn, year)?;

            let Some(path) = output else {
                reports::write_collaborations_csv(std::io::stdout().lock(), &collabs)?;
                return Ok(());
            };

            let totals = reports::export_collaborations_csv(&path, &collabs)?;
            info!("Exported {} collaborations to {:?}", totals.count, path);

            if ctx.json {
                return print_json(&json!({
                    "exported": totals.count,
                    "path": path,
                    "net": money_string(totals.net),
                }));
            }

            println!(
                "{} Exported {} collaboration(s) to {}",
                "✓".green().bold(),
                totals.count,
                path.display()
            );
            Ok(())
        }
    }
}

/// Parse `name=amount` team member arguments
fn parse_members(raw: &[String]) -> Result<Vec<TeamMember>> {
    raw.iter().map(|entry| parse_member(entry)).collect()
}

fn parse_member(entry: &str) -> Result<TeamMember> {
    let (name, amount) = entry.split_once('=').ok_or_else(|| {
        PanelError::ParseError(format!("team member '{}' must look like name=amount", entry))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(PanelError::ValidationError(format!("team member '{}' has no name", entry)).into());
    }

    Ok(TeamMember::new(name, parse_amount(amount)?))
}

fn collab_json(collab: &Collaboration) -> Value {
    let members: Vec<Value> = collab
        .team_members
        .iter()
        .map(|m| json!({ "name": m.name, "share": money_string(m.share_amount) }))
        .collect();

    json!({
        "id": collab.id,
        "date": collab.collab_date,
        "brand": collab.brand,
        "description": collab.description,
        "billing_type": collab.billing_type,
        "known_billing_type": collab.billing().is_some(),
        "fiscal": collab.is_fiscal(),
        "is_paid": collab.is_paid,
        "notes": collab.notes,
        "breakdown": breakdown_json(&collab.breakdown()),
        "team_members": members,
        "team_total": money_string(collab.team_total()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_member_accepts_polish_amounts() {
        let member = parse_member("Ala Kot=1 200,50").unwrap();
        assert_eq!(member.name, "Ala Kot");
        assert_eq!(member.share_amount, dec!(1200.50));
    }

    #[test]
    fn parse_member_rejects_bad_entries() {
        assert!(parse_member("Ala").is_err());
        assert!(parse_member("=100").is_err());
        assert!(parse_member("Ala=-5").is_err());
    }
}
