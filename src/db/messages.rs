//! Per-entry conversation log (separate from the audit trail).

use crate::errors::{AppError, AppResult};
use crate::models::message::{EntryMessage, MessageKind};
use chrono::Utc;
use rusqlite::{Connection, Result, Row, params};

fn map_row(row: &Row) -> Result<EntryMessage> {
    let kind_str: String = row.get("kind")?;
    let kind = MessageKind::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Other(format!("invalid message kind: {kind_str}"))),
        )
    })?;

    Ok(EntryMessage {
        id: row.get("id")?,
        entry_id: row.get("entry_id")?,
        author_user_id: row.get("author_user_id")?,
        kind,
        body: row.get("body")?,
        created_at: row.get("created_at")?,
    })
}

pub fn append_message(
    conn: &Connection,
    entry_id: i64,
    author_user_id: i64,
    kind: MessageKind,
    body: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO entry_messages (entry_id, author_user_id, kind, body, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry_id,
            author_user_id,
            kind.to_db_str(),
            body,
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_for_entry(conn: &Connection, entry_id: i64) -> AppResult<Vec<EntryMessage>> {
    let mut stmt = conn
        .prepare_cached("SELECT * FROM entry_messages WHERE entry_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([entry_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
