use anyhow::Result;
use serde_json::json;

use super::{print_json, Context};
use crate::cli::ConfigCommands;
use influ::config::config_path;

pub async fn dispatch_config(action: ConfigCommands, ctx: &Context) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            if ctx.json {
                return print_json(&serde_json::to_value(&ctx.config)?);
            }
            print!("{}", ctx.config.to_toml()?);
            Ok(())
        }

        ConfigCommands::Path => {
            let path = config_path()?;
            if ctx.json {
                return print_json(&json!({ "path": path, "exists": path.exists() }));
            }
            println!("{}", path.display());
            Ok(())
        }
    }
}
