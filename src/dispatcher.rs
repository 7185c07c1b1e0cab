//! Command dispatcher that routes parsed clap commands to their handlers.
//!
//! Handlers print either colored tables or, with `--json`, a JSON document on
//! stdout. Money in JSON is a 2 dp string so no precision is lost to floats.

mod collabs;
mod config;
mod dashboard;
mod followers;
mod ideas;
mod income;
mod purchases;
mod tax;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::{json, Value};

use crate::cli::Commands;
use influ::config::Config;
use influ::db;
use influ::reports::IncomeTotals;
use influ::tax::TaxBreakdown;
use influ::utils::money_string;

/// Everything a handler needs besides its own arguments
pub struct Context {
    pub json: bool,
    /// Today, or the `--as-of` override
    pub as_of: NaiveDate,
    pub config: Config,
}

impl Context {
    /// Open the configured database, creating it on first use
    pub fn open_db(&self) -> Result<Connection> {
        let path = self.config.database.path.clone();

        if let Some(parent) = path.as_deref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context(format!("Failed to create database directory {:?}", parent))?;
            }
        }

        db::init_database(path.clone())?;
        db::open_db(path)
    }
}

/// Route a parsed command to its handler
pub async fn dispatch_command(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Tax { action } => tax::dispatch_tax(action, ctx).await,
        Commands::Collabs { action } => collabs::dispatch_collabs(action, ctx).await,
        Commands::Income { action } => income::dispatch_income(action, ctx).await,
        Commands::Purchases { action } => purchases::dispatch_purchases(action, ctx).await,
        Commands::Ideas { action } => ideas::dispatch_ideas(action, ctx).await,
        Commands::Followers { action } => followers::dispatch_followers(action, ctx).await,
        Commands::Dashboard { year } => dashboard::dispatch_dashboard(year, ctx).await,
        Commands::Config { action } => config::dispatch_config(action, ctx).await,
    }
}

fn print_json(payload: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

fn breakdown_json(breakdown: &TaxBreakdown) -> Value {
    json!({
        "gross": money_string(breakdown.gross),
        "commission": money_string(breakdown.commission),
        "kup": money_string(breakdown.kup),
        "tax_base": money_string(breakdown.tax_base),
        "tax": money_string(breakdown.tax),
        "social_insurance": money_string(breakdown.social_insurance),
        "health_insurance": money_string(breakdown.health_insurance),
        "net": money_string(breakdown.net),
    })
}

fn totals_json(totals: &IncomeTotals) -> Value {
    json!({
        "count": totals.count,
        "gross": money_string(totals.gross),
        "commission": money_string(totals.commission),
        "tax": money_string(totals.tax),
        "contributions": money_string(totals.contributions),
        "net": money_string(totals.net),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use influ::tax::{get_breakdown, BillingType};
    use rust_decimal_macros::dec;

    #[test]
    fn breakdown_json_rounds_for_display() {
        let payload = breakdown_json(&get_breakdown(dec!(1000), BillingType::UmowaPraca));
        assert_eq!(payload["social_insurance"], "137.10");
        assert_eq!(payload["net"], "681.69");
    }

    #[test]
    fn open_db_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = Some(dir.path().join("nested").join("panel.db"));
        let ctx = Context {
            json: false,
            as_of: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            config,
        };

        ctx.open_db().unwrap();
        assert!(dir.path().join("nested").join("panel.db").exists());
    }
}
