use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::user::CapabilitySet;
use crate::ui::messages::success;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User {
        add,
        list,
        name,
        email,
        caps,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        if *add {
            let name = name
                .as_deref()
                .ok_or_else(|| AppError::ValidationFailed("--name is required".to_string()))?;
            let email = email
                .as_deref()
                .ok_or_else(|| AppError::ValidationFailed("--email is required".to_string()))?;
            let capabilities = CapabilitySet::from_db_str(caps)
                .ok_or_else(|| AppError::InvalidCapability(caps.clone()))?;

            let id = users::create_user(&pool.conn, name, email, &capabilities)?;
            success(format!("Added user #{id}: {name} <{email}> [{caps}]"));
        }

        if *list {
            let all = users::list_users(&pool.conn)?;
            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("Name", 24),
                Column::new("Email", 28),
                Column::new("Capabilities", 28),
            ]);
            for u in all {
                table.add_row(vec![
                    u.id.to_string(),
                    u.name,
                    u.email,
                    u.capabilities.to_db_str(),
                ]);
            }
            println!("{}", table.render());
        }
    }

    Ok(())
}
