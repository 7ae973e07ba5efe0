pub mod audit_view;
pub mod backup;
pub mod guard;
pub mod notify;
pub mod state_machine;
pub mod workflow;
