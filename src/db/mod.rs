pub mod audit_sink;
pub mod entry_store;
pub mod initialize;
pub mod messages;
pub mod migrate;
pub mod pool;
pub mod stats;
pub mod users;
