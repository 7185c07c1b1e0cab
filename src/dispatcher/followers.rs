use anyhow::Result;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::info;

use super::{print_json, Context};
use crate::cli::formatters::format_followers_table;
use crate::cli::FollowerCommands;
use influ::db::{self, FollowerSnapshot, Platform};
use influ::utils::parse_date;

pub async fn dispatch_followers(action: FollowerCommands, ctx: &Context) -> Result<()> {
    match action {
        FollowerCommands::Record {
            platform,
            count,
            date,
        } => {
            let platform: Platform = platform.parse()?;
            let recorded_on = match date {
                Some(raw) => parse_date(&raw)?,
                None => ctx.as_of,
            };
            let snapshot = FollowerSnapshot {
                id: None,
                platform,
                followers: count,
                recorded_on,
            };

            let conn = ctx.open_db()?;
            let id = db::record_follower_snapshot(&conn, &snapshot)?;
            info!("Recorded {} followers on {} for {}", count, platform.as_str(), recorded_on);

            if ctx.json {
                return print_json(&json!({
                    "id": id,
                    "platform": platform,
                    "followers": count,
                    "recorded_on": recorded_on,
                }));
            }
            println!(
                "{} {}: {} followers on {}",
                "✓".green().bold(),
                platform.display_name().bold(),
                count,
                recorded_on
            );
            Ok(())
        }

        FollowerCommands::Show => {
            let conn = ctx.open_db()?;
            let snapshots = db::latest_follower_snapshots(&conn, ctx.as_of)?;
            let total = db::total_followers(snapshots.iter().map(|s| s.followers));

            if ctx.json {
                let platforms: Vec<Value> = snapshots
                    .iter()
                    .map(|s| {
                        json!({
                            "platform": s.platform,
                            "followers": s.followers,
                            "recorded_on": s.recorded_on,
                        })
                    })
                    .collect();
                return print_json(&json!({ "platforms": platforms, "total": total }));
            }

            if snapshots.is_empty() {
                println!("{} No follower counts recorded", "ℹ".blue().bold());
                return Ok(());
            }
            print!("{}", format_followers_table(&snapshots));
            Ok(())
        }
    }
}
