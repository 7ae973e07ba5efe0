use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::audit_view::AuditView;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Audit { entry } = &cli.command {
        let mut pool = DbPool::new(&cfg.database)?;
        AuditView::print_trail(&mut pool, entry.as_deref())?;
    }

    Ok(())
}
