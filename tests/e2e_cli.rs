mod cli_helpers;

use anyhow::Result;
use assert_cmd::prelude::*;
use cli_helpers::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

// ============ tax ============

#[test]
fn tax_calc_umowa_50_json() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["tax", "calc", "1000", "umowa_50"])?;

    assert_eq!(value["billing_type"], "umowa_50");
    assert_eq!(value["breakdown"]["kup"], "500.00");
    assert_eq!(value["breakdown"]["tax_base"], "500.00");
    assert_eq!(value["breakdown"]["tax"], "60.00");
    assert_eq!(value["breakdown"]["net"], "940.00");
    Ok(())
}

#[test]
fn tax_calc_useme_20_accepts_polish_amount_and_case() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["tax", "calc", "1 000,00", "USEME-20"])?;

    assert_eq!(value["breakdown"]["commission"], "78.00");
    assert_eq!(value["breakdown"]["kup"], "200.00");
    assert_eq!(value["breakdown"]["tax_base"], "800.00");
    assert_eq!(value["breakdown"]["tax"], "96.00");
    assert_eq!(value["breakdown"]["net"], "826.00");
    Ok(())
}

#[test]
fn tax_calc_table_has_no_ansi_when_piped() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["tax", "calc", "1000", "umowa_praca"])
        .assert()
        .success()
        .stdout(predicate::str::contains("681,69 zł"))
        .stdout(predicate::str::contains("ZUS"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn tax_calc_rejects_unknown_type() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["tax", "calc", "1000", "b2b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown billing type 'b2b'"));
}

#[test]
fn tax_calc_rejects_negative_gross() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["tax", "calc", "--", "-100", "umowa_50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("negative"));
}

#[test]
fn tax_compare_lists_every_type() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["tax", "compare", "1000"])?;
    let types = value["types"].as_array().cloned().unwrap_or_default();

    assert_eq!(types.len(), 6);
    let net_of = |tag: &str| {
        types
            .iter()
            .find(|t| t["billing_type"] == tag)
            .map(|t| t["breakdown"]["net"].clone())
    };
    assert_eq!(net_of("useme_50"), Some(json!("862.00")));
    assert_eq!(net_of("useme_20"), Some(json!("826.00")));
    assert_eq!(net_of("gotowka"), Some(json!("1000.00")));
    Ok(())
}

#[test]
fn tax_commands_do_not_create_database() -> Result<()> {
    let home = setup_temp_home();
    run_cmd(&home, &["tax", "calc", "1000", "gotowka"])?;
    assert!(!db_path_for_home(&home).exists());
    Ok(())
}

// ============ collaborations ============

#[test]
fn collab_add_with_members_then_list() -> Result<()> {
    let home = setup_temp_home();
    run_cmd(
        &home,
        &[
            "collabs", "add", "Zalando", "1000", "useme_20", "--date", "2024-03-01", "--member",
            "Ala=150", "--member", "Ola=50,50",
        ],
    )?;

    let list = run_cmd_json(&home, &["collabs", "list"])?;
    let rows = list.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["brand"], "Zalando");
    assert_eq!(rows[0]["date"], "2024-03-01");
    assert_eq!(rows[0]["breakdown"]["net"], "826.00");
    assert_eq!(rows[0]["team_members"].as_array().map(|m| m.len()), Some(2));
    assert_eq!(rows[0]["team_total"], "200.50");
    Ok(())
}

#[test]
fn collab_add_defaults_to_as_of_date() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["collabs", "add", "Nike", "500", "gotowka"])?;
    assert_eq!(value["date"], AS_OF);
    assert_eq!(value["fiscal"], false);
    Ok(())
}

#[test]
fn collab_update_recomputes_net() -> Result<()> {
    let home = setup_temp_home();
    let id = add_collab(&home, "Nike", "1000", "umowa_50", "2024-02-10")?;
    let id_arg = id.to_string();

    let value = run_cmd_json(&home, &["collabs", "update", &id_arg, "--type", "gotowka", "--paid"])?;
    assert_eq!(value["billing_type"], "gotowka");
    assert_eq!(value["breakdown"]["net"], "1000.00");
    assert_eq!(value["is_paid"], true);

    let value = run_cmd_json(&home, &["collabs", "update", &id_arg, "--gross", "2000", "--type", "umowa_20"])?;
    // kup 400, base 1600, tax 192
    assert_eq!(value["breakdown"]["net"], "1808.00");
    Ok(())
}

#[test]
fn collab_update_missing_id_fails() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["collabs", "update", "99", "--gross", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("collaboration #99 not found"));
}

#[test]
fn collab_remove_and_list_empty() -> Result<()> {
    let home = setup_temp_home();
    let id = add_collab(&home, "Nike", "1000", "umowa_50", "2024-02-10")?;
    run_cmd(&home, &["collabs", "remove", &id.to_string()])?;

    base_cmd(&home)
        .args(["collabs", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No collaborations found"));
    Ok(())
}

#[test]
fn collab_export_to_file() -> Result<()> {
    let home = setup_temp_home();
    add_collab(&home, "Zalando", "1000", "useme_20", "2024-03-20")?;
    add_collab(&home, "Nike", "1000", "umowa_50", "2024-03-10")?;
    add_collab(&home, "Old", "1000", "umowa_50", "2023-12-31")?;

    let out = home.path().join("export.csv");
    let out_arg = out.to_string_lossy().to_string();
    let value = run_cmd_json(&home, &["collabs", "export", "--year", "2024", "--output", &out_arg])?;
    assert_eq!(value["exported"], 2);

    let csv = std::fs::read_to_string(&out)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("2024-03-10,Nike,umowa_50,true,"));
    assert!(lines[2].ends_with(",826.00,1766.00"));
    assert!(lines[3].starts_with("TOTAL,"));
    Ok(())
}

#[test]
fn collab_export_to_stdout() -> Result<()> {
    let home = setup_temp_home();
    add_collab(&home, "Nike", "1000", "umowa_50", "2024-03-10")?;

    base_cmd(&home)
        .args(["collabs", "export"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("date,brand,billing_type"))
        .stdout(predicate::str::contains("TOTAL,,,,1000.00"));
    Ok(())
}

// ============ income ============

#[test]
fn income_summary_splits_fiscal_and_cash() -> Result<()> {
    let home = setup_temp_home();
    add_collab(&home, "Nike", "1000", "umowa_50", "2024-01-10")?;
    add_collab(&home, "Zalando", "1000", "useme_20", "2024-01-20")?;
    add_collab(&home, "Market", "300", "gotowka", "2024-02-05")?;

    let value = run_cmd_json(&home, &["income", "summary", "2024"])?;
    assert_eq!(value["months"].as_array().map(|m| m.len()), Some(2));
    assert_eq!(value["months"][0]["totals"]["net"], "1766.00");
    assert_eq!(value["fiscal"]["net"], "1766.00");
    assert_eq!(value["cash"]["net"], "300.00");
    assert_eq!(value["total"]["count"], 3);
    assert_eq!(value["by_billing_type"]["useme_20"]["commission"], "78.00");
    Ok(())
}

#[test]
fn income_summary_empty_year() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["income", "summary", "2020"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No collaborations in 2020"));
}

// ============ purchases ============

#[test]
fn purchases_deadlines_and_urgent_badge() -> Result<()> {
    let home = setup_temp_home();
    add_purchase(&home, "Due today", "100", "2024-03-01", "14")?;
    add_purchase(&home, "Soon", "200", "2024-03-05", "14")?;
    add_purchase(&home, "Overdue", "300", "2024-02-01", "14")?;
    add_purchase(&home, "Later", "400", "2024-03-10", "30")?;

    let list = run_cmd_json(&home, &["purchases", "list"])?;
    let rows = list.as_array().cloned().unwrap_or_default();
    let stores: Vec<&str> = rows.iter().filter_map(|r| r["store_name"].as_str()).collect();
    assert_eq!(stores, vec!["Overdue", "Due today", "Soon", "Later"]);
    assert_eq!(rows[1]["days_remaining"], 0);
    assert_eq!(rows[1]["urgency"], "today");
    assert_eq!(rows[0]["urgency"], "overdue");
    assert_eq!(rows[2]["urgency"], "soon");

    let urgent = run_cmd_json(&home, &["purchases", "urgent"])?;
    assert_eq!(urgent["count"], 2);
    assert_eq!(urgent["purchases"][0]["store_name"], "Due today");
    Ok(())
}

#[test]
fn purchase_status_transitions() -> Result<()> {
    let home = setup_temp_home();
    let id = add_purchase(&home, "Zalando", "249,99", "2024-03-10", "14")?;
    let id_arg = id.to_string();

    let value = run_cmd_json(&home, &["purchases", "status", &id_arg, "returned"])?;
    assert_eq!(value["status"], "returned");
    assert_eq!(value["returned_at"], AS_OF);
    assert_eq!(value["returned_amount"], "249.99");
    assert_eq!(value["urgent"], false);

    let urgent = run_cmd_json(&home, &["purchases", "urgent"])?;
    assert_eq!(urgent["count"], 0);

    let value = run_cmd_json(&home, &["purchases", "status", &id_arg, "kept"])?;
    assert!(value["returned_at"].is_null());
    assert!(value["returned_amount"].is_null());

    let value = run_cmd_json(
        &home,
        &["purchases", "status", &id_arg, "partial", "--returned-amount", "50"],
    )?;
    assert!(value["returned_at"].is_null());
    assert_eq!(value["returned_amount"], "50.00");

    let value = run_cmd_json(&home, &["purchases", "status", &id_arg, "returned"])?;
    assert_eq!(value["status"], "returned");
    assert_eq!(value["returned_at"], AS_OF);
    assert_eq!(value["returned_amount"], "249.99");

    // repeating returned keeps the stored amount
    let value = run_cmd_json(&home, &["purchases", "status", &id_arg, "returned"])?;
    assert_eq!(value["returned_amount"], "249.99");
    Ok(())
}

#[test]
fn purchase_status_rejects_returned_amount_above_price() -> Result<()> {
    let home = setup_temp_home();
    let id = add_purchase(&home, "Zalando", "100", "2024-03-10", "14")?;

    base_cmd(&home)
        .args(["purchases", "status", &id.to_string(), "partial", "--returned-amount", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds purchase amount"));
    Ok(())
}

#[test]
fn oversized_amount_is_rejected_on_input() -> Result<()> {
    let home = setup_temp_home();

    base_cmd(&home)
        .args(["collabs", "add", "Nike", "79228162514264337593543950335", "gotowka"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));
    Ok(())
}

#[test]
fn purchase_status_rejects_unknown_status() -> Result<()> {
    let home = setup_temp_home();
    let id = add_purchase(&home, "Zalando", "100", "2024-03-10", "14")?;

    base_cmd(&home)
        .args(["purchases", "status", &id.to_string(), "lost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown purchase status"));
    Ok(())
}

#[test]
fn purchase_window_defaults_to_config() -> Result<()> {
    let home = setup_temp_home();
    write_config(&home, "[returns]\ndefault_window_days = 30\n")?;

    let value = run_cmd_json(&home, &["purchases", "add", "Allegro", "120"])?;
    assert_eq!(value["return_window_days"], 30);
    assert_eq!(value["return_deadline"], "2024-04-14");
    Ok(())
}

// ============ ideas / followers ============

#[test]
fn ideas_pipeline() -> Result<()> {
    let home = setup_temp_home();
    let idea = run_cmd_json(&home, &["ideas", "add", "Haul wiosenny", "--platform", "tt"])?;
    assert_eq!(idea["platform"], "tiktok");
    let id = idea["id"].as_i64().unwrap_or_default().to_string();
    run_cmd_json(&home, &["ideas", "add", "Unboxing"])?;

    run_cmd(&home, &["ideas", "status", &id, "filmed"])?;

    let filmed = run_cmd_json(&home, &["ideas", "list", "--status", "filmed"])?;
    assert_eq!(filmed.as_array().map(|a| a.len()), Some(1));
    assert_eq!(filmed[0]["title"], "Haul wiosenny");

    let all = run_cmd_json(&home, &["ideas", "list"])?;
    assert_eq!(all.as_array().map(|a| a.len()), Some(2));
    Ok(())
}

#[test]
fn followers_total_uses_latest_snapshot_per_platform() -> Result<()> {
    let home = setup_temp_home();
    run_cmd(&home, &["followers", "record", "instagram", "1000", "--date", "2024-03-01"])?;
    run_cmd(&home, &["followers", "record", "instagram", "1200", "--date", "2024-03-10"])?;
    run_cmd(&home, &["followers", "record", "youtube", "300", "--date", "2024-03-02"])?;
    // after the as-of date, ignored
    run_cmd(&home, &["followers", "record", "youtube", "9999", "--date", "2024-04-01"])?;

    let value = run_cmd_json(&home, &["followers", "show"])?;
    assert_eq!(value["total"], 1500);
    assert_eq!(value["platforms"].as_array().map(|a| a.len()), Some(2));
    Ok(())
}

// ============ dashboard / config ============

#[test]
fn dashboard_snapshot() -> Result<()> {
    let home = setup_temp_home();
    add_collab(&home, "Nike", "1000", "umowa_50", "2024-01-10")?;
    add_collab(&home, "Market", "300", "gotowka", "2024-02-05")?;
    add_purchase(&home, "Due today", "100", "2024-03-01", "14")?;
    run_cmd(&home, &["ideas", "add", "Vlog"])?;
    run_cmd(&home, &["followers", "record", "instagram", "1000"])?;

    let value = run_cmd_json(&home, &["dashboard"])?;
    assert_eq!(value["as_of"], AS_OF);
    assert_eq!(value["income"]["year"], 2024);
    assert_eq!(value["income"]["fiscal"]["net"], "940.00");
    assert_eq!(value["income"]["cash"]["net"], "300.00");
    assert_eq!(value["urgent_count"], 1);
    assert_eq!(value["ideas_by_status"]["idea"], 1);
    assert_eq!(value["total_followers"], 1000);
    Ok(())
}

#[test]
fn no_subcommand_shows_dashboard() {
    let home = setup_temp_home();
    base_cmd(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard"))
        .stdout(predicate::str::contains("No returns due this week"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn config_changes_default_billing_and_database() -> Result<()> {
    let home = setup_temp_home();
    let db = home.path().join("custom").join("panel.db");
    write_config(
        &home,
        &format!(
            "[database]\npath = {:?}\n\n[collaborations]\ndefault_billing_type = \"useme_50\"\n",
            db.to_string_lossy()
        ),
    )?;

    let value = run_cmd_json(&home, &["collabs", "add", "Nike", "1000"])?;
    assert_eq!(value["billing_type"], "useme_50");
    assert_eq!(value["breakdown"]["net"], "862.00");
    assert!(db.exists());
    assert!(!db_path_for_home(&home).exists());

    let shown = run_cmd_json(&home, &["config", "show"])?;
    assert_eq!(shown["collaborations"]["default_billing_type"], "useme_50");
    assert_eq!(shown["returns"]["default_window_days"], 14);
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<()> {
    let home = setup_temp_home();
    write_config(&home, "[collaborations]\ndefault_billing_type = \"b2b\"\n")?;

    base_cmd(&home)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
    Ok(())
}

#[test]
fn config_path_follows_env() -> Result<()> {
    let home = setup_temp_home();
    let value = run_cmd_json(&home, &["config", "path"])?;
    assert_eq!(
        value["path"],
        config_path_for_home(&home).to_string_lossy().to_string()
    );
    assert_eq!(value["exists"], false);
    Ok(())
}
