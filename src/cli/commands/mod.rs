pub mod add;
pub mod audit;
pub mod backup;
pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod init;
pub mod lifecycle;
pub mod list;
pub mod message;
pub mod review;
pub mod user;

use crate::cli::parser::Cli;
use crate::db::pool::DbPool;
use crate::db::{entry_store, users};
use crate::errors::{AppError, AppResult};
use crate::models::user::Actor;
use crate::models::work_entry::WorkEntry;

/// Resolve the acting user from the global `--user` flag.
pub fn load_actor(pool: &DbPool, cli: &Cli) -> AppResult<Actor> {
    let id = cli.user.ok_or_else(|| {
        AppError::ValidationFailed("--user <id> is required for this command".to_string())
    })?;
    let user = users::require_by_id(&pool.conn, id)?;
    Ok(Actor::new(user))
}

/// Load the entry snapshot a workflow command will operate on.
pub fn load_entry(pool: &DbPool, id: i64) -> AppResult<WorkEntry> {
    entry_store::get_by_id(&pool.conn, id)?.ok_or(AppError::EntryNotFound(id))
}
