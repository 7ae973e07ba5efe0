use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure the append-only audit table exists. It must be created first:
/// one-off migrations record their marker rows here.
fn ensure_audit_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS audit_log (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            actor_user_id INTEGER,
            ip            TEXT,
            action        TEXT NOT NULL,
            table_name    TEXT NOT NULL,
            record_id     INTEGER NOT NULL DEFAULT 0,
            before_state  TEXT,
            after_state   TEXT,
            description   TEXT NOT NULL,
            entry_number  TEXT,
            metadata      TEXT,
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_entry_number ON audit_log(entry_number);
        CREATE INDEX IF NOT EXISTS idx_audit_record ON audit_log(table_name, record_id);
        "#,
    )?;
    Ok(())
}

fn ensure_users_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            email        TEXT NOT NULL UNIQUE,
            capabilities TEXT NOT NULL DEFAULT 'member',
            created_at   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn ensure_work_entries_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS work_entries (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_number         TEXT NOT NULL UNIQUE,
            owner_user_id        INTEGER NOT NULL REFERENCES users(id),
            creator_user_id      INTEGER NOT NULL REFERENCES users(id),
            category             TEXT NOT NULL,
            work_date            TEXT NOT NULL,
            time_from            TEXT,
            time_to              TEXT,
            hours                REAL NOT NULL,
            project              TEXT NOT NULL DEFAULT '',
            description          TEXT NOT NULL DEFAULT '',
            status               TEXT NOT NULL DEFAULT 'draft'
                                 CHECK(status IN ('draft','submitted','clarification','approved','rejected','cancelled')),
            reviewer_user_id     INTEGER,
            reviewed_at          TEXT,
            rejection_reason     TEXT,
            return_reason        TEXT,
            is_corrected         INTEGER NOT NULL DEFAULT 0,
            corrected_by_user_id INTEGER,
            corrected_at         TEXT,
            correction_reason    TEXT,
            original_hours       REAL,
            submitted_at         TEXT,
            version              INTEGER NOT NULL DEFAULT 1,
            deleted_at           TEXT,
            created_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_status ON work_entries(status);
        CREATE INDEX IF NOT EXISTS idx_entries_owner ON work_entries(owner_user_id);
        CREATE INDEX IF NOT EXISTS idx_entries_work_date ON work_entries(work_date);
        "#,
    )?;
    Ok(())
}

fn ensure_entry_messages_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entry_messages (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id       INTEGER NOT NULL REFERENCES work_entries(id),
            author_user_id INTEGER NOT NULL REFERENCES users(id),
            kind           TEXT NOT NULL CHECK(kind IN ('comment','question')),
            body           TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_entry ON entry_messages(entry_id);
        "#,
    )?;
    Ok(())
}

/// Has a one-off migration already been applied?
fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM audit_log
         WHERE action = 'migration_applied' AND description = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_migration_applied(conn: &Connection, version: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO audit_log (action, table_name, record_id, description, created_at)
         VALUES ('migration_applied', 'schema', 0, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// 0.3.0: structured metadata on audit rows (older databases predate it).
fn migrate_add_audit_metadata_column(conn: &Connection) -> Result<()> {
    let version = "20260301_0003_add_audit_metadata";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    if !column_exists(conn, "audit_log", "metadata")? {
        conn.execute("ALTER TABLE audit_log ADD COLUMN metadata TEXT;", [])?;
        success("Migration applied: added 'metadata' to audit_log.");
    }

    mark_migration_applied(conn, version)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_audit_table(conn)?;
    ensure_users_table(conn)?;
    ensure_work_entries_table(conn)?;
    ensure_entry_messages_table(conn)?;

    migrate_add_audit_metadata_column(conn)?;

    Ok(())
}
