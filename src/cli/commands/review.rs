//! Review commands: approve, reject, return for clarification, correct.

use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::notify::ConsoleNotifier;
use crate::core::workflow::WorkflowEngine;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let id = match &cli.command {
        Commands::Approve { id }
        | Commands::Reject { id, .. }
        | Commands::Return { id, .. }
        | Commands::Correct { id, .. } => *id,
        _ => return Ok(()),
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let actor = super::load_actor(&pool, cli)?;
    let entry = super::load_entry(&pool, id)?;

    let notifier = ConsoleNotifier;
    let engine = WorkflowEngine::new(&notifier);

    let updated = match &cli.command {
        Commands::Approve { .. } => engine.approve(&mut pool, &entry, &actor)?,
        Commands::Reject { reason, .. } => engine.reject(&mut pool, &entry, &actor, reason)?,
        Commands::Return { reason, .. } => {
            engine.return_for_revision(&mut pool, &entry, &actor, reason)?
        }
        Commands::Correct { hours, reason, .. } => {
            engine.correct(&mut pool, &entry, &actor, *hours, reason)?
        }
        _ => unreachable!(),
    };

    if let Commands::Correct { hours, .. } = &cli.command {
        success(format!(
            "Entry {} corrected to {:.2} hours.",
            updated.entry_number, hours
        ));
    } else {
        success(format!(
            "Entry {} is now {}.",
            updated.entry_number, updated.status
        ));
    }
    Ok(())
}
