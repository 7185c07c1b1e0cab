#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Fixed "today" so deadline assertions do not depend on the wall clock
pub const AS_OF: &str = "2024-03-15";

pub fn config_path_for_home(home: &TempDir) -> PathBuf {
    home.path().join("influ-config.toml")
}

pub fn db_path_for_home(home: &TempDir) -> PathBuf {
    home.path().join(".influ").join("data.db")
}

pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("influ"));
    cmd.env("HOME", home.path());
    cmd.env("INFLU_CONFIG", config_path_for_home(home));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd.args(["--as-of", AS_OF]);
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_cmd(home, &full)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn write_config(home: &TempDir, contents: &str) -> Result<()> {
    std::fs::write(config_path_for_home(home), contents)?;
    Ok(())
}

pub fn add_collab(home: &TempDir, brand: &str, gross: &str, billing: &str, date: &str) -> Result<i64> {
    let value = run_cmd_json(home, &["collabs", "add", brand, gross, billing, "--date", date])?;
    match value["id"].as_i64() {
        Some(id) => Ok(id),
        None => bail!("no id in {}", value),
    }
}

pub fn add_purchase(home: &TempDir, store: &str, amount: &str, date: &str, window: &str) -> Result<i64> {
    let value = run_cmd_json(
        home,
        &["purchases", "add", store, amount, "--date", date, "--window", window],
    )?;
    match value["id"].as_i64() {
        Some(id) => Ok(id),
        None => bail!("no id in {}", value),
    }
}
