//! Durable store for work entries.
//!
//! Every mutation goes through [`compare_and_swap`]: the UPDATE is
//! conditional on the version the caller read, and bumps it by one.
//! Zero rows affected means somebody else committed first (or the row
//! is gone); the workflow engine turns that into the right error.

use crate::errors::{AppError, AppResult};
use crate::models::audit::Value;
use crate::models::status::EntryStatus;
use crate::models::work_entry::WorkEntry;
use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, ToSql, params};

const ENTRY_COLUMNS: &str = "id, entry_number, owner_user_id, creator_user_id, category, \
     work_date, time_from, time_to, hours, project, description, status, \
     reviewer_user_id, reviewed_at, rejection_reason, return_reason, \
     is_corrected, corrected_by_user_id, corrected_at, correction_reason, \
     original_hours, submitted_at, version, deleted_at, created_at";

pub fn map_row(row: &Row) -> Result<WorkEntry> {
    let date_str: String = row.get("work_date")?;
    let work_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let status_str: String = row.get("status")?;
    let status = EntryStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(WorkEntry {
        id: row.get("id")?,
        entry_number: row.get("entry_number")?,
        owner_user_id: row.get("owner_user_id")?,
        creator_user_id: row.get("creator_user_id")?,
        category: row.get("category")?,
        work_date,
        time_from: row.get("time_from")?,
        time_to: row.get("time_to")?,
        hours: row.get("hours")?,
        project: row.get("project")?,
        description: row.get("description")?,
        status,
        reviewer_user_id: row.get("reviewer_user_id")?,
        reviewed_at: row.get("reviewed_at")?,
        rejection_reason: row.get("rejection_reason")?,
        return_reason: row.get("return_reason")?,
        is_corrected: row.get::<_, i64>("is_corrected")? != 0,
        corrected_by_user_id: row.get("corrected_by_user_id")?,
        corrected_at: row.get("corrected_at")?,
        correction_reason: row.get("correction_reason")?,
        original_hours: row.get("original_hours")?,
        submitted_at: row.get("submitted_at")?,
        version: row.get("version")?,
        deleted_at: row.get("deleted_at")?,
        created_at: row.get("created_at")?,
    })
}

/// Load a single active (not soft-deleted) entry by id.
pub fn get_by_id(conn: &Connection, id: i64) -> AppResult<Option<WorkEntry>> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM work_entries WHERE id = ?1 AND deleted_at IS NULL");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get_by_entry_number(conn: &Connection, number: &str) -> AppResult<Option<WorkEntry>> {
    let sql =
        format!("SELECT {ENTRY_COLUMNS} FROM work_entries WHERE entry_number = ?1 AND deleted_at IS NULL");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([number], map_row).optional()?)
}

/// Does the row still exist in the active set? Used to tell a version
/// conflict apart from a vanished row after a zero-row CAS.
pub fn exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM work_entries WHERE id = ?1 AND deleted_at IS NULL")?;
    Ok(stmt.exists([id])?)
}

/// Conditional update: applies `fields` only if the stored version still
/// equals `expected_version`, bumping the version in the same statement.
/// Returns false when zero rows were affected.
///
/// Field names are compile-time constants supplied by the workflow
/// engine, never user input.
pub fn compare_and_swap(
    conn: &Connection,
    id: i64,
    expected_version: i64,
    fields: &[(&str, Value)],
) -> AppResult<bool> {
    let mut sql = String::from("UPDATE work_entries SET version = version + 1");
    for (name, _) in fields {
        sql.push_str(&format!(", {name} = ?"));
    }
    sql.push_str(" WHERE id = ? AND version = ? AND deleted_at IS NULL");

    let mut params_vec: Vec<&dyn ToSql> = fields.iter().map(|(_, v)| v as &dyn ToSql).collect();
    params_vec.push(&id);
    params_vec.push(&expected_version);

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.execute(rusqlite::params_from_iter(params_vec))?;
    Ok(rows == 1)
}

/// Allocate the next human-readable entry number for the given year,
/// e.g. "VH-2026-0042". Runs inside the caller's insert transaction so
/// the sequence cannot race.
fn next_entry_number(conn: &Connection, year: i32) -> AppResult<String> {
    let prefix = format!("VH-{year}-");
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*) FROM work_entries WHERE entry_number LIKE ?1 || '%'",
    )?;
    let count: i64 = stmt.query_row([&prefix], |r| r.get(0))?;
    Ok(format!("{prefix}{:04}", count + 1))
}

/// Fields needed to create a new draft entry.
pub struct NewEntry<'a> {
    pub owner_user_id: i64,
    pub creator_user_id: i64,
    pub category: &'a str,
    pub work_date: NaiveDate,
    pub time_from: Option<&'a str>,
    pub time_to: Option<&'a str>,
    pub hours: f64,
    pub project: &'a str,
    pub description: &'a str,
}

/// Insert a new draft entry and return its id and entry number.
/// Caller owns the surrounding transaction.
pub fn insert_draft(conn: &Connection, new: &NewEntry) -> AppResult<(i64, String)> {
    let year = new.work_date.year();
    let entry_number = next_entry_number(conn, year)?;
    conn.execute(
        "INSERT INTO work_entries
            (entry_number, owner_user_id, creator_user_id, category, work_date,
             time_from, time_to, hours, project, description, status, version, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'draft', 1, ?11)",
        params![
            entry_number,
            new.owner_user_id,
            new.creator_user_id,
            new.category,
            new.work_date.format("%Y-%m-%d").to_string(),
            new.time_from,
            new.time_to,
            new.hours,
            new.project,
            new.description,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok((conn.last_insert_rowid(), entry_number))
}

/// List active entries, optionally filtered by status and/or period
/// (YYYY, YYYY-MM or YYYY-MM-DD against the work date).
pub fn list_entries(
    conn: &Connection,
    status: Option<EntryStatus>,
    period: Option<&str>,
) -> AppResult<Vec<WorkEntry>> {
    let mut sql = format!("SELECT {ENTRY_COLUMNS} FROM work_entries WHERE deleted_at IS NULL");
    let mut owned: Vec<String> = Vec::new();

    if let Some(st) = status {
        sql.push_str(" AND status = ?");
        owned.push(st.to_db_str().to_string());
    }

    if let Some(p) = period {
        match p.len() {
            4 => sql.push_str(" AND strftime('%Y', work_date) = ?"),
            7 => sql.push_str(" AND strftime('%Y-%m', work_date) = ?"),
            10 => sql.push_str(" AND work_date = ?"),
            _ => return Err(AppError::InvalidDate(p.to_string())),
        }
        owned.push(p.to_string());
    }

    sql.push_str(" ORDER BY work_date ASC, id ASC");

    let mut stmt = conn.prepare_cached(&sql)?;
    let param_refs: Vec<&dyn ToSql> = owned.iter().map(|s| s as &dyn ToSql).collect();
    let rows = stmt.query_map(param_refs.as_slice(), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Entries waiting for a decision (submitted or clarification).
pub fn list_pending_review(conn: &Connection) -> AppResult<Vec<WorkEntry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM work_entries
         WHERE deleted_at IS NULL AND status IN ('submitted', 'clarification')
         ORDER BY submitted_at ASC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
