pub mod audit;
pub mod message;
pub mod status;
pub mod user;
pub mod work_entry;
