//! Unified application error type.
//! All modules (db, core, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Workflow taxonomy
    // ---------------------------
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not allowed: {0}")]
    AuthorizationDenied(String),

    #[error("Not allowed on this entry: {0}")]
    SelfActionDenied(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Entry {entry_number} was modified by someone else (expected version {expected})")]
    ConcurrencyConflict { entry_number: String, expected: i64 },

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Work entry {0} not found")]
    EntryNotFound(i64),

    #[error("User {0} not found")]
    UserNotFound(i64),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid hours value: {0}")]
    InvalidHours(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid capability: {0}")]
    InvalidCapability(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Notification (raised by Notifier impls, absorbed by the engine)
    // ---------------------------
    #[error("Notification error: {0}")]
    Notification(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True for errors the caller can recover from by fixing the request
    /// (wrong state, missing reason, stale version). Infrastructure errors
    /// (Io, Db, Migration) are not recoverable this way.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            AppError::InvalidTransition { .. }
                | AppError::AuthorizationDenied(_)
                | AppError::SelfActionDenied(_)
                | AppError::ValidationFailed(_)
                | AppError::ConcurrencyConflict { .. }
        )
    }
}
