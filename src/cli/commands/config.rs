use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config { print_config } = cmd {
        if *print_config {
            let path = Config::config_file();
            if path.exists() {
                println!("📄 {}\n", path.display());
                println!("{}", fs::read_to_string(&path)?);
            } else {
                println!("No config file yet; using defaults:");
                println!("database: {}", cfg.database);
                println!("default_category: {}", cfg.default_category);
                println!("max_hours_per_entry: {}", cfg.max_hours_per_entry);
            }
        }
    }
    Ok(())
}
