use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) USERS AND ENTRIES
    //
    let users: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    let entries: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM work_entries WHERE deleted_at IS NULL",
        [],
        |row| row.get(0),
    )?;
    let audit_rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;

    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, users, RESET);
    println!("{}• Entries:{} {}{}{}", CYAN, RESET, GREEN, entries, RESET);
    println!("{}• Audit rows:{} {}{}{}", CYAN, RESET, GREEN, audit_rows, RESET);

    //
    // 3) ENTRIES PER STATUS
    //
    println!("{}• By status:{}", CYAN, RESET);
    let mut stmt = pool.conn.prepare(
        "SELECT status, COUNT(*) FROM work_entries
         WHERE deleted_at IS NULL GROUP BY status ORDER BY status",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for r in rows {
        let (status, n) = r?;
        println!("    {status}: {n}");
    }

    //
    // 4) WORK DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT work_date FROM work_entries WHERE deleted_at IS NULL ORDER BY work_date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT work_date FROM work_entries WHERE deleted_at IS NULL ORDER BY work_date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Work date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
