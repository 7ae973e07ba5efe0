//! Controller lifecycle commands: submit, withdraw, cancel, reactivate.

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::notify::ConsoleNotifier;
use crate::core::workflow::WorkflowEngine;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let id = match &cli.command {
        Commands::Submit { id }
        | Commands::Withdraw { id }
        | Commands::Cancel { id }
        | Commands::Reactivate { id } => *id,
        _ => return Ok(()),
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let actor = super::load_actor(&pool, cli)?;
    let entry = super::load_entry(&pool, id)?;

    let notifier = ConsoleNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let updated = match &cli.command {
        Commands::Submit { .. } => engine.submit(&mut pool, &entry, &actor)?,
        Commands::Withdraw { .. } => engine.withdraw(&mut pool, &entry, &actor)?,
        Commands::Cancel { .. } => engine.cancel(&mut pool, &entry, &actor)?,
        Commands::Reactivate { .. } => engine.reactivate(&mut pool, &entry, &actor)?,
        _ => unreachable!(),
    };

    success(format!(
        "Entry {} is now {}.",
        updated.entry_number, updated.status
    ));
    Ok(())
}
