//! User directory: lookups by id and by capability.

use crate::errors::{AppError, AppResult};
use crate::models::user::{Capability, CapabilitySet, User};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<User> {
    let caps_str: String = row.get("capabilities")?;
    let capabilities = CapabilitySet::from_db_str(&caps_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidCapability(caps_str.clone())),
        )
    })?;

    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        capabilities,
        created_at: row.get("created_at")?,
    })
}

pub fn create_user(
    conn: &Connection,
    name: &str,
    email: &str,
    capabilities: &CapabilitySet,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (name, email, capabilities, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, capabilities.to_db_str(), Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM users WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Like find_by_id, but a missing user is an error.
pub fn require_by_id(conn: &Connection, id: i64) -> AppResult<User> {
    find_by_id(conn, id)?.ok_or(AppError::UserNotFound(id))
}

/// All users holding the given capability. Administrators are included
/// when asking for reviewers, since they may review too.
pub fn find_by_capability(conn: &Connection, cap: Capability) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        let user = r?;
        let matches = match cap {
            Capability::Reviewer => user.capabilities.can_review(),
            other => user.capabilities.has(other),
        };
        if matches {
            out.push(user);
        }
    }
    Ok(out)
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM users ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
