use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { file, compress } = &cli.command {
        BackupLogic::backup(cfg, file, *compress)?;
    }

    Ok(())
}
