use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::notify::ConsoleNotifier;
use crate::core::workflow::{DraftPatch, WorkflowEngine};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::NaiveDate;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        date,
        hours,
        category,
        time_from,
        time_to,
        project,
        description,
    } = &cli.command
    {
        let work_date = match date {
            Some(d) => Some(
                NaiveDate::parse_from_str(d, "%Y-%m-%d")
                    .map_err(|_| AppError::InvalidDate(d.clone()))?,
            ),
            None => None,
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let actor = super::load_actor(&pool, cli)?;
        let entry = super::load_entry(&pool, *id)?;

        let patch = DraftPatch {
            category: category.clone(),
            work_date,
            time_from: time_from.clone(),
            time_to: time_to.clone(),
            hours: *hours,
            project: project.clone(),
            description: description.clone(),
        };

        let notifier = ConsoleNotifier;
        let engine = WorkflowEngine::new(&notifier);
        let updated = engine.edit_draft(&mut pool, &entry, &actor, &patch)?;

        success(format!("Updated entry {} (v{}).", updated.entry_number, updated.version));
    }

    Ok(())
}
