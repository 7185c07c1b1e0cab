// Database module - SQLite connection and models

pub mod models;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::PanelError;
use crate::returns::PurchaseStatus;
use crate::utils::MAX_AMOUNT;
/// Upper bound for a single follower snapshot
pub const MAX_FOLLOWERS: i64 = 10_000_000_000;

pub use models::{
    Collaboration, FollowerSnapshot, IdeaStatus, Platform, Purchase, TeamMember, VideoIdea,
};

/// Get the default database path (~/.influ/data.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let influ_dir = PathBuf::from(home).join(".influ");

    std::fs::create_dir_all(&influ_dir).context("Failed to create .influ directory")?;

    Ok(influ_dir.join("data.db"))
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = match db_path {
        Some(path) => path,
        None => get_default_db_path()?,
    };
    let conn = Connection::open(&path)
        .map_err(|e| PanelError::DbError(format!("cannot open {:?}: {}", path, e)))?;

    // Needed for ON DELETE CASCADE on collaboration members
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("Failed to enable foreign keys")?;

    Ok(conn)
}

/// Initialize the database with schema
///
/// Creates the database file if needed and runs the (idempotent) schema SQL.
pub fn init_database(db_path: Option<PathBuf>) -> Result<()> {
    let path = match db_path {
        Some(path) => path,
        None => get_default_db_path()?,
    };

    debug!("Initializing database at: {:?}", path);

    let conn = open_db(Some(path))?;
    conn.execute_batch(include_str!("schema.sql"))
        .context("Failed to execute schema")?;

    Ok(())
}

/// Helper to read Decimal from SQLite (handles both INTEGER, REAL and TEXT)
pub fn get_decimal_value(row: &Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let s = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            Decimal::from_str(s)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))),
        _ => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Null,
        )),
    }
}

/// Helper to read optional Decimal from SQLite
fn get_optional_decimal_value(row: &Row, idx: usize) -> Result<Option<Decimal>, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        _ => get_decimal_value(row, idx).map(Some),
    }
}

/// Helper to read a text column through `FromStr`
fn get_parsed<T>(row: &Row, idx: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr<Err = PanelError>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn ensure_valid_amount(what: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(PanelError::InvalidAmount(format!("{} cannot be negative: {}", what, amount)).into());
    }
    if amount > MAX_AMOUNT {
        return Err(PanelError::InvalidAmount(format!("{} exceeds {}: {}", what, MAX_AMOUNT, amount)).into());
    }
    Ok(())
}

fn ensure_returned_amount(purchase: &Purchase) -> Result<()> {
    if let Some(returned) = purchase.returned_amount {
        ensure_valid_amount("returned amount", returned)?;
        if returned > purchase.amount {
            return Err(PanelError::ValidationError(format!(
                "returned amount {} exceeds purchase amount {}",
                returned, purchase.amount
            ))
            .into());
        }
    }
    Ok(())
}

// ============ Collaborations ============

/// Insert a collaboration together with its team members.
///
/// Runs in one transaction: either the collaboration and every member row
/// are written, or nothing is.
pub fn insert_collaboration(conn: &mut Connection, collab: &Collaboration) -> Result<i64> {
    ensure_valid_amount("gross amount", collab.amount_gross)?;
    for member in &collab.team_members {
        ensure_valid_amount("team member share", member.share_amount)?;
    }

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO collaborations (
            brand, description, collab_date, amount_gross, billing_type,
            amount_net, is_paid, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            collab.brand,
            collab.description,
            collab.collab_date,
            collab.amount_gross.to_string(),
            collab.billing_type,
            collab.amount_net.to_string(),
            collab.is_paid,
            collab.notes,
            collab.created_at,
        ],
    )?;
    let collab_id = tx.last_insert_rowid();

    insert_members(&tx, collab_id, &collab.team_members)?;
    tx.commit().context("Failed to commit collaboration")?;

    info!(
        "Saved collaboration #{} ({}, {} members)",
        collab_id,
        collab.brand,
        collab.team_members.len()
    );
    Ok(collab_id)
}

/// Update a collaboration and replace its team members, atomically.
pub fn update_collaboration(conn: &mut Connection, collab: &Collaboration) -> Result<()> {
    let id = collab
        .id
        .ok_or_else(|| PanelError::ValidationError("collaboration has no id".to_string()))?;
    ensure_valid_amount("gross amount", collab.amount_gross)?;
    for member in &collab.team_members {
        ensure_valid_amount("team member share", member.share_amount)?;
    }

    let tx = conn.transaction()?;
    let updated = tx.execute(
        "UPDATE collaborations
         SET brand = ?1, description = ?2, collab_date = ?3, amount_gross = ?4,
             billing_type = ?5, amount_net = ?6, is_paid = ?7, notes = ?8
         WHERE id = ?9",
        params![
            collab.brand,
            collab.description,
            collab.collab_date,
            collab.amount_gross.to_string(),
            collab.billing_type,
            collab.amount_net.to_string(),
            collab.is_paid,
            collab.notes,
            id,
        ],
    )?;
    if updated == 0 {
        return Err(PanelError::NotFound {
            entity: "collaboration",
            id,
        }
        .into());
    }

    tx.execute(
        "DELETE FROM collaboration_members WHERE collaboration_id = ?1",
        [id],
    )?;
    insert_members(&tx, id, &collab.team_members)?;
    tx.commit().context("Failed to commit collaboration update")?;

    Ok(())
}

fn insert_members(conn: &Connection, collab_id: i64, members: &[TeamMember]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO collaboration_members (collaboration_id, name, share_amount)
         VALUES (?1, ?2, ?3)",
    )?;
    for member in members {
        stmt.execute(params![collab_id, member.name, member.share_amount.to_string()])
            .context(format!("Failed to save team member '{}'", member.name))?;
    }
    Ok(())
}

/// Delete a collaboration (members go with it)
pub fn delete_collaboration(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM collaborations WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(PanelError::NotFound {
            entity: "collaboration",
            id,
        }
        .into());
    }
    Ok(())
}

const COLLABORATION_COLUMNS: &str = "id, brand, description, collab_date, amount_gross, billing_type,
                amount_net, is_paid, notes, created_at";

fn collaboration_from_row(row: &Row) -> Result<Collaboration, rusqlite::Error> {
    Ok(Collaboration {
        id: Some(row.get(0)?),
        brand: row.get(1)?,
        description: row.get(2)?,
        collab_date: row.get(3)?,
        amount_gross: get_decimal_value(row, 4)?,
        billing_type: row.get(5)?,
        amount_net: get_decimal_value(row, 6)?,
        is_paid: row.get(7)?,
        notes: row.get(8)?,
        team_members: Vec::new(),
        created_at: row.get(9)?,
    })
}

fn load_members(conn: &Connection, collab_id: i64) -> Result<Vec<TeamMember>> {
    let mut stmt = conn.prepare(
        "SELECT id, collaboration_id, name, share_amount
         FROM collaboration_members
         WHERE collaboration_id = ?1
         ORDER BY id ASC",
    )?;

    let members = stmt
        .query_map([collab_id], |row| {
            Ok(TeamMember {
                id: Some(row.get(0)?),
                collaboration_id: Some(row.get(1)?),
                name: row.get(2)?,
                share_amount: get_decimal_value(row, 3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(members)
}

/// Get a single collaboration with its team members
pub fn get_collaboration(conn: &Connection, id: i64) -> Result<Option<Collaboration>> {
    let sql = format!("SELECT {} FROM collaborations WHERE id = ?1", COLLABORATION_COLUMNS);
    let collab = conn
        .query_row(&sql, [id], collaboration_from_row)
        .optional()?;

    match collab {
        Some(mut collab) => {
            collab.team_members = load_members(conn, id)?;
            Ok(Some(collab))
        }
        None => Ok(None),
    }
}

/// List collaborations ordered by date, optionally restricted to one year
pub fn list_collaborations(conn: &Connection, year: Option<i32>) -> Result<Vec<Collaboration>> {
    let mut sql = format!("SELECT {} FROM collaborations", COLLABORATION_COLUMNS);
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(y) = year {
        let from = NaiveDate::from_ymd_opt(y, 1, 1)
            .ok_or_else(|| PanelError::ValidationError(format!("invalid year {}", y)))?;
        let to = NaiveDate::from_ymd_opt(y, 12, 31)
            .ok_or_else(|| PanelError::ValidationError(format!("invalid year {}", y)))?;
        sql.push_str(" WHERE collab_date >= ? AND collab_date <= ?");
        params.push(Box::new(from));
        params.push(Box::new(to));
    }
    sql.push_str(" ORDER BY collab_date ASC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut collabs = stmt
        .query_map(param_refs.as_slice(), collaboration_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    for collab in &mut collabs {
        if let Some(id) = collab.id {
            collab.team_members = load_members(conn, id)?;
        }
    }

    Ok(collabs)
}

// ============ Purchases ============

/// Insert a purchase
pub fn insert_purchase(conn: &Connection, purchase: &Purchase) -> Result<i64> {
    ensure_valid_amount("purchase amount", purchase.amount)?;
    ensure_returned_amount(purchase)?;

    conn.execute(
        "INSERT INTO purchases (
            store_name, items_description, purchase_date, return_window_days, amount,
            status, returned_amount, returned_at, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            purchase.store_name,
            purchase.items_description,
            purchase.purchase_date,
            purchase.return_window_days,
            purchase.amount.to_string(),
            purchase.status.as_str(),
            purchase.returned_amount.map(|d| d.to_string()),
            purchase.returned_at,
            purchase.created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

const PURCHASE_COLUMNS: &str = "id, store_name, items_description, purchase_date, return_window_days,
                amount, status, returned_amount, returned_at, created_at";

fn purchase_from_row(row: &Row) -> Result<Purchase, rusqlite::Error> {
    Ok(Purchase {
        id: Some(row.get(0)?),
        store_name: row.get(1)?,
        items_description: row.get(2)?,
        purchase_date: row.get(3)?,
        return_window_days: row.get(4)?,
        amount: get_decimal_value(row, 5)?,
        status: get_parsed::<PurchaseStatus>(row, 6)?,
        returned_amount: get_optional_decimal_value(row, 7)?,
        returned_at: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Get a single purchase
pub fn get_purchase(conn: &Connection, id: i64) -> Result<Option<Purchase>> {
    let sql = format!("SELECT {} FROM purchases WHERE id = ?1", PURCHASE_COLUMNS);
    Ok(conn.query_row(&sql, [id], purchase_from_row).optional()?)
}

/// All purchases, newest first (callers re-sort for display)
pub fn list_purchases(conn: &Connection) -> Result<Vec<Purchase>> {
    let sql = format!(
        "SELECT {} FROM purchases ORDER BY purchase_date DESC, id DESC",
        PURCHASE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let purchases = stmt
        .query_map([], purchase_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(purchases)
}

/// Persist status, returned_at and returned_amount of a purchase
pub fn update_purchase_status(conn: &Connection, purchase: &Purchase) -> Result<()> {
    let id = purchase
        .id
        .ok_or_else(|| PanelError::ValidationError("purchase has no id".to_string()))?;
    ensure_returned_amount(purchase)?;

    let updated = conn.execute(
        "UPDATE purchases SET status = ?1, returned_at = ?2, returned_amount = ?3 WHERE id = ?4",
        params![
            purchase.status.as_str(),
            purchase.returned_at,
            purchase.returned_amount.map(|d| d.to_string()),
            id,
        ],
    )?;
    if updated == 0 {
        return Err(PanelError::NotFound {
            entity: "purchase",
            id,
        }
        .into());
    }
    Ok(())
}

/// Delete a purchase
pub fn delete_purchase(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM purchases WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(PanelError::NotFound {
            entity: "purchase",
            id,
        }
        .into());
    }
    Ok(())
}

// ============ Video ideas ============

/// Insert a video idea
pub fn insert_idea(conn: &Connection, idea: &VideoIdea) -> Result<i64> {
    if idea.title.trim().is_empty() {
        return Err(PanelError::ValidationError("idea title cannot be empty".to_string()).into());
    }

    conn.execute(
        "INSERT INTO video_ideas (title, notes, platform, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            idea.title,
            idea.notes,
            idea.platform.map(|p| p.as_str()),
            idea.status.as_str(),
            idea.created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// List ideas, optionally filtered by status, oldest first
pub fn list_ideas(conn: &Connection, status: Option<IdeaStatus>) -> Result<Vec<VideoIdea>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, notes, platform, status, created_at
         FROM video_ideas
         WHERE ?1 IS NULL OR status = ?1
         ORDER BY created_at ASC, id ASC",
    )?;

    let ideas = stmt
        .query_map([status.map(|s| s.as_str())], |row| {
            let platform: Option<String> = row.get(3)?;
            let platform = platform
                .map(|p| {
                    p.parse::<Platform>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                    })
                })
                .transpose()?;
            Ok(VideoIdea {
                id: Some(row.get(0)?),
                title: row.get(1)?,
                notes: row.get(2)?,
                platform,
                status: get_parsed::<IdeaStatus>(row, 4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ideas)
}

/// Move an idea along the pipeline
pub fn update_idea_status(conn: &Connection, id: i64, status: IdeaStatus) -> Result<()> {
    let updated = conn.execute(
        "UPDATE video_ideas SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if updated == 0 {
        return Err(PanelError::NotFound { entity: "idea", id }.into());
    }
    Ok(())
}

/// Delete an idea
pub fn delete_idea(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM video_ideas WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(PanelError::NotFound { entity: "idea", id }.into());
    }
    Ok(())
}

/// Number of ideas per status (statuses without ideas are omitted)
pub fn count_ideas_by_status(conn: &Connection) -> Result<Vec<(IdeaStatus, i64)>> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM video_ideas GROUP BY status")?;
    let mut counts = stmt
        .query_map([], |row| Ok((get_parsed::<IdeaStatus>(row, 0)?, row.get(1)?)))?
        .collect::<Result<Vec<(IdeaStatus, i64)>, _>>()?;
    counts.sort_by_key(|(status, _)| *status);
    Ok(counts)
}

// ============ Followers ============

/// Record a follower count; recording the same platform twice on one day replaces it
pub fn record_follower_snapshot(conn: &Connection, snapshot: &FollowerSnapshot) -> Result<i64> {
    if snapshot.followers < 0 {
        return Err(PanelError::ValidationError("follower count cannot be negative".to_string()).into());
    }
    if snapshot.followers > MAX_FOLLOWERS {
        return Err(PanelError::ValidationError(format!(
            "follower count {} exceeds {}",
            snapshot.followers, MAX_FOLLOWERS
        ))
        .into());
    }

    conn.execute(
        "INSERT INTO follower_snapshots (platform, followers, recorded_on)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(platform, recorded_on) DO UPDATE SET followers = excluded.followers",
        params![
            snapshot.platform.as_str(),
            snapshot.followers,
            snapshot.recorded_on,
        ],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM follower_snapshots WHERE platform = ?1 AND recorded_on = ?2",
        params![snapshot.platform.as_str(), snapshot.recorded_on],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Sum of follower counts, saturating instead of overflowing
pub fn total_followers(counts: impl IntoIterator<Item = i64>) -> i64 {
    counts.into_iter().fold(0i64, i64::saturating_add)
}

/// Latest snapshot per platform recorded on or before `as_of`
pub fn latest_follower_snapshots(conn: &Connection, as_of: NaiveDate) -> Result<Vec<FollowerSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.platform, s.followers, s.recorded_on
         FROM follower_snapshots s
         WHERE s.recorded_on = (
             SELECT MAX(recorded_on) FROM follower_snapshots
             WHERE platform = s.platform AND recorded_on <= ?1
         )
         ORDER BY s.platform ASC",
    )?;

    let snapshots = stmt
        .query_map([as_of], |row| {
            Ok(FollowerSnapshot {
                id: Some(row.get(0)?),
                platform: get_parsed::<Platform>(row, 1)?,
                followers: row.get(2)?,
                recorded_on: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(snapshots)
}
