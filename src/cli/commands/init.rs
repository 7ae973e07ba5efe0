use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::audit_sink;
use crate::db::initialize::init_db;
use crate::errors::AppResult;
use crate::models::audit::AuditRecord;
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the SQLite database (prod or test mode)
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    Config::init_all(cli.db.clone(), cli.test)?;

    let cfg = Config::load()?;
    let db_path = if let Some(custom) = &cli.db {
        custom.clone()
    } else {
        cfg.database.clone()
    };

    println!("⚙️  Initializing clubhours…");
    println!("🗄️  Database   : {}", &db_path);

    let conn = Connection::open(&db_path)?;
    init_db(&conn)?;

    println!("✅ Database initialized at {}", &db_path);

    // Non-blocking trace of the initialization itself
    if let Err(e) = audit_sink::append(
        &conn,
        &AuditRecord {
            actor_user_id: None,
            ip: None,
            action: "init".to_string(),
            table_name: "schema".to_string(),
            record_id: 0,
            before: None,
            after: None,
            description: format!("database initialized at {db_path}"),
            entry_number: None,
            metadata: None,
        },
    ) {
        eprintln!("⚠️ Failed to write audit entry: {}", e);
    }

    println!("🎉 clubhours initialization completed!");
    Ok(())
}
