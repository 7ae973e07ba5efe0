//! Transition table for the entry lifecycle.
//!
//! draft → submitted → (clarification | approved | rejected | draft | cancelled)
//! clarification → (approved | rejected | draft | cancelled)
//! cancelled → draft
//! approved / rejected are terminal.

use crate::errors::{AppError, AppResult};
use crate::models::status::EntryStatus;

/// Pure lookup: is `from → to` a legal edge? No side effects.
pub fn can_transition(from: EntryStatus, to: EntryStatus) -> bool {
    use EntryStatus::*;
    matches!(
        (from, to),
        (Draft, Submitted)
            | (Submitted, Clarification)
            | (Submitted, Approved)
            | (Submitted, Rejected)
            | (Submitted, Draft)
            | (Submitted, Cancelled)
            | (Clarification, Approved)
            | (Clarification, Rejected)
            | (Clarification, Draft)
            | (Clarification, Cancelled)
            | (Cancelled, Draft)
    )
}

/// Same check, as an error carrying both state names.
pub fn ensure_transition(from: EntryStatus, to: EntryStatus) -> AppResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            from: from.to_db_str().to_string(),
            to: to.to_db_str().to_string(),
        })
    }
}
