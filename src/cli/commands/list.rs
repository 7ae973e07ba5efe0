use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::{entry_store, messages};
use crate::errors::{AppError, AppResult};
use crate::models::message::MessageKind;
use crate::models::status::EntryStatus;
use crate::utils::colors::{GREY, RESET, color_for_status};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        period,
        status,
        pending,
        messages: show_messages,
    } = &cli.command
    {
        let pool = DbPool::new(&cfg.database)?;

        let entries = if *pending {
            entry_store::list_pending_review(&pool.conn)?
        } else {
            let status_filter = match status {
                Some(s) => Some(
                    EntryStatus::from_db_str(s)
                        .ok_or_else(|| AppError::InvalidStatus(s.clone()))?,
                ),
                None => None,
            };
            entry_store::list_entries(&pool.conn, status_filter, period.as_deref())?
        };

        if entries.is_empty() {
            println!("No entries found.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 4),
            Column::new("Number", 12),
            Column::new("Date", 10),
            Column::new("Hours", 6),
            Column::new("Status", 22),
            Column::new("Owner", 6),
            Column::new("Category", 12),
            Column::new("Description", 30),
        ]);

        for e in &entries {
            let status_str = e.status.to_db_str();
            let colored = format!("{}{status_str}{RESET}", color_for_status(status_str));
            table.add_row(vec![
                e.id.to_string(),
                e.entry_number.clone(),
                e.date_str(),
                format!("{:.2}", e.hours),
                colored,
                e.owner_user_id.to_string(),
                e.category.clone(),
                e.description.clone(),
            ]);
        }

        print!("{}", table.render());

        let total: f64 = entries.iter().map(|e| e.hours).sum();
        println!("\nTotal: {} entries, {:.2} hours", entries.len(), total);

        if *show_messages {
            for e in &entries {
                let log = messages::list_for_entry(&pool.conn, e.id)?;
                if log.is_empty() {
                    continue;
                }
                println!("\n💬 {}:", e.entry_number);
                for m in log {
                    let tag = match m.kind {
                        MessageKind::Question => "question",
                        MessageKind::Comment => "comment",
                    };
                    println!(
                        "  {GREY}[{}]{RESET} user {} ({tag}): {}",
                        m.created_at, m.author_user_id, m.body
                    );
                }
            }
        }
    }

    Ok(())
}
