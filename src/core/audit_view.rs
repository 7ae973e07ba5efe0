//! Rendering of the audit trail for the `audit` CLI command.

use crate::db::audit_sink;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, MAGENTA, RED, RESET, YELLOW};

fn color_for_action(action: &str) -> &'static str {
    match action {
        "created" => GREEN,
        "status_change" => CYAN,
        "correction" => YELLOW,
        "deleted" => RED,
        "migration_applied" | "backup" => MAGENTA,
        _ => RESET,
    }
}

pub struct AuditView;

impl AuditView {
    pub fn print_trail(pool: &mut DbPool, entry_number: Option<&str>) -> AppResult<()> {
        let rows = audit_sink::list(&pool.conn, entry_number)?;

        if rows.is_empty() {
            println!("No audit entries.");
            return Ok(());
        }

        let id_w = rows
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(2);
        let action_w = rows.iter().map(|r| r.action.len()).max().unwrap_or(8);

        println!("📜 Audit trail:\n");

        for row in rows {
            let date = chrono::DateTime::parse_from_rfc3339(&row.created_at)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(row.created_at.clone());

            let number = row.entry_number.as_deref().unwrap_or("-");
            let actor = row
                .actor_user_id
                .map(|id| format!("user {id}"))
                .unwrap_or_else(|| format!("{GREY}system{RESET}"));
            let color = color_for_action(&row.action);

            println!(
                "{:>id_w$}: {} | {}{:<action_w$}{} | {:>10} | {} => {}",
                row.id,
                date,
                color,
                row.action,
                RESET,
                number,
                actor,
                row.description,
                id_w = id_w,
                action_w = action_w
            );

            if let (Some(before), Some(after)) = (&row.before_state, &row.after_state) {
                println!("{GREY}      before: {before}{RESET}");
                println!("{GREY}      after:  {after}{RESET}");
            }
        }

        Ok(())
    }
}
