use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::notify::ConsoleNotifier;
use crate::core::workflow::WorkflowEngine;
use crate::db::entry_store::NewEntry;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::NaiveDate;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        date,
        hours,
        owner,
        category,
        time_from,
        time_to,
        project,
        description,
    } = &cli.command
    {
        let work_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(date.clone()))?;

        let mut pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let actor = super::load_actor(&pool, cli)?;
        let owner_id = owner.unwrap_or_else(|| actor.id());

        let new = NewEntry {
            owner_user_id: owner_id,
            creator_user_id: actor.id(),
            category: category.as_deref().unwrap_or(&cfg.default_category),
            work_date,
            time_from: time_from.as_deref(),
            time_to: time_to.as_deref(),
            hours: *hours,
            project,
            description,
        };

        let notifier = ConsoleNotifier;
        let engine = WorkflowEngine::new(&notifier);
        let entry = engine.create_draft(&mut pool, &actor, &new)?;

        success(format!(
            "Created draft entry {} (#{}): {} h on {}.",
            entry.entry_number, entry.id, entry.hours, entry.date_str()
        ));
    }

    Ok(())
}
