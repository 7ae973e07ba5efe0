use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::notify::ConsoleNotifier;
use crate::core::workflow::WorkflowEngine;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id } = &cli.command {
        let mut pool = DbPool::new(&cfg.database)?;
        let actor = super::load_actor(&pool, cli)?;
        let entry = super::load_entry(&pool, *id)?;

        let notifier = ConsoleNotifier;
        let engine = WorkflowEngine::new(&notifier);
        engine.soft_delete(&mut pool, &entry, &actor)?;

        success(format!("Deleted draft entry {}.", entry.entry_number));
    }

    Ok(())
}
