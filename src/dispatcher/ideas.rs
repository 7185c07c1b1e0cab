use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde_json::{json, Value};
use tracing::info;

use super::{print_json, Context};
use crate::cli::formatters::format_ideas_table;
use crate::cli::IdeaCommands;
use influ::db::{self, IdeaStatus, Platform, VideoIdea};

pub async fn dispatch_ideas(action: IdeaCommands, ctx: &Context) -> Result<()> {
    match action {
        IdeaCommands::Add {
            title,
            notes,
            platform,
        } => {
            let platform = platform.map(|raw| raw.parse::<Platform>()).transpose()?;
            let mut idea = VideoIdea {
                id: None,
                title,
                notes,
                platform,
                status: IdeaStatus::Idea,
                created_at: Utc::now(),
            };

            let conn = ctx.open_db()?;
            let id = db::insert_idea(&conn, &idea)?;
            idea.id = Some(id);
            info!("Added idea #{}", id);

            if ctx.json {
                return print_json(&idea_json(&idea));
            }
            println!("{} Added idea #{} {}", "✓".green().bold(), id, idea.title.bold());
            Ok(())
        }

        IdeaCommands::List { status } => {
            let status = status.map(|raw| raw.parse::<IdeaStatus>()).transpose()?;
            let conn = ctx.open_db()?;
            let ideas = db::list_ideas(&conn, status)?;

            if ctx.json {
                let rows: Vec<Value> = ideas.iter().map(idea_json).collect();
                return print_json(&Value::Array(rows));
            }

            if ideas.is_empty() {
                println!("{} No ideas found", "ℹ".blue().bold());
                return Ok(());
            }
            println!("{}", format_ideas_table(&ideas));
            Ok(())
        }

        IdeaCommands::Status { id, status } => {
            let status: IdeaStatus = status.parse()?;
            let conn = ctx.open_db()?;
            db::update_idea_status(&conn, id, status)?;
            info!("Idea #{} moved to {}", id, status.as_str());

            if ctx.json {
                return print_json(&json!({ "id": id, "status": status }));
            }
            println!("{} Idea #{} is now {}", "✓".green().bold(), id, status.as_str().bold());
            Ok(())
        }

        IdeaCommands::Remove { id } => {
            let conn = ctx.open_db()?;
            db::delete_idea(&conn, id)?;

            if ctx.json {
                return print_json(&json!({ "removed": id }));
            }
            println!("{} Removed idea #{}", "✓".green().bold(), id);
            Ok(())
        }
    }
}

fn idea_json(idea: &VideoIdea) -> Value {
    json!({
        "id": idea.id,
        "title": idea.title,
        "notes": idea.notes,
        "platform": idea.platform,
        "status": idea.status,
        "created_at": idea.created_at.to_rfc3339(),
    })
}
