mod cli;
mod dispatcher;

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use dispatcher::Context;
use influ::config::Config;
use influ::utils::parse_date;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = Config::load()?;
    let as_of = match cli.as_of.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };

    let ctx = Context {
        json: cli.json,
        as_of,
        config,
    };

    let command = cli.command.unwrap_or(Commands::Dashboard { year: None });
    dispatcher::dispatch_command(command, &ctx).await
}
