#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use clubhours::core::notify::NullNotifier;
use clubhours::core::workflow::WorkflowEngine;
use clubhours::db::entry_store::NewEntry;
use clubhours::db::initialize::init_db;
use clubhours::db::pool::DbPool;
use clubhours::db::users;
use clubhours::models::user::{Actor, Capability, CapabilitySet};
use clubhours::models::work_entry::WorkEntry;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn ch() -> Command {
    cargo_bin_cmd!("clubhours")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_clubhours.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Open a pool on the test DB with the full schema in place
pub fn open_pool(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// Insert a user with the given capabilities and return it as an actor
pub fn seed_actor(pool: &DbPool, name: &str, caps: &[Capability]) -> Actor {
    let email = format!("{}@club.test", name.to_lowercase());
    let set = CapabilitySet::new(caps.to_vec());
    let id = users::create_user(&pool.conn, name, &email, &set).expect("create user");
    let user = users::require_by_id(&pool.conn, id).expect("load user");
    Actor::new(user)
}

/// Create a draft entry owned and created by `actor`
pub fn seed_draft(pool: &mut DbPool, actor: &Actor, date: &str, hours: f64) -> WorkEntry {
    seed_draft_for(pool, actor, actor.id(), date, hours)
}

/// Create a draft entry owned by `owner_id` but created by `actor`
pub fn seed_draft_for(
    pool: &mut DbPool,
    actor: &Actor,
    owner_id: i64,
    date: &str,
    hours: f64,
) -> WorkEntry {
    let work_date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date");
    let notifier = NullNotifier;
    let engine = WorkflowEngine::new(&notifier);
    engine
        .create_draft(
            pool,
            actor,
            &NewEntry {
                owner_user_id: owner_id,
                creator_user_id: actor.id(),
                category: "general",
                work_date,
                time_from: None,
                time_to: None,
                hours,
                project: "",
                description: "test entry",
            },
        )
        .expect("create draft")
}

/// Reload an entry by id, panicking if it vanished
pub fn reload(pool: &DbPool, id: i64) -> WorkEntry {
    clubhours::db::entry_store::get_by_id(&pool.conn, id)
        .expect("query entry")
        .expect("entry exists")
}
