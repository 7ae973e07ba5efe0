//! Append-only audit trail.
//!
//! Rows are written inside the same transaction as the entity write
//! they describe, and are never updated or deleted afterwards.

use crate::errors::AppResult;
use crate::models::audit::{AuditLogEntry, AuditRecord};
use chrono::Utc;
use rusqlite::{Connection, Result, Row, ToSql, params};

/// Append one audit row. `conn` is expected to be the transaction that
/// also carries the entity write, so both commit or roll back together.
pub fn append(conn: &Connection, rec: &AuditRecord) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO audit_log
            (actor_user_id, ip, action, table_name, record_id,
             before_state, after_state, description, entry_number, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    stmt.execute(params![
        rec.actor_user_id,
        rec.ip,
        rec.action,
        rec.table_name,
        rec.record_id,
        rec.before.as_ref().map(|s| s.to_json()),
        rec.after.as_ref().map(|s| s.to_json()),
        rec.description,
        rec.entry_number,
        rec.metadata.as_ref().map(|m| m.to_string()),
        Utc::now().to_rfc3339(),
    ])?;
    Ok(())
}

fn map_row(row: &Row) -> Result<AuditLogEntry> {
    Ok(AuditLogEntry {
        id: row.get("id")?,
        actor_user_id: row.get("actor_user_id")?,
        ip: row.get("ip")?,
        action: row.get("action")?,
        table_name: row.get("table_name")?,
        record_id: row.get("record_id")?,
        before_state: row.get("before_state")?,
        after_state: row.get("after_state")?,
        description: row.get("description")?,
        entry_number: row.get("entry_number")?,
        metadata: row.get("metadata")?,
        created_at: row.get("created_at")?,
    })
}

/// Full trail in insertion order, optionally narrowed to one entry number.
pub fn list(conn: &Connection, entry_number: Option<&str>) -> AppResult<Vec<AuditLogEntry>> {
    let (sql, args): (&str, Vec<&dyn ToSql>) = match entry_number {
        Some(ref n) => (
            "SELECT * FROM audit_log WHERE entry_number = ?1 ORDER BY id ASC",
            vec![n as &dyn ToSql],
        ),
        None => ("SELECT * FROM audit_log ORDER BY id ASC", Vec::new()),
    };

    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(args.as_slice(), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Number of audit rows recorded for one entry.
pub fn count_for_entry(conn: &Connection, entry_number: &str) -> AppResult<i64> {
    let mut stmt =
        conn.prepare_cached("SELECT COUNT(*) FROM audit_log WHERE entry_number = ?1")?;
    let n: i64 = stmt.query_row([entry_number], |r| r.get(0))?;
    Ok(n)
}
