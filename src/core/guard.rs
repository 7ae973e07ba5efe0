//! Authorization decisions over (entry, actor).
//!
//! Two distinct failure modes: `AuthorizationDenied` means the actor
//! lacks the capability for the action at all; `SelfActionDenied` means
//! the capability is there but this particular entry is off limits
//! (reviewing your own hours, or hours you entered for someone else).

use crate::errors::{AppError, AppResult};
use crate::models::status::EntryStatus;
use crate::models::user::User;
use crate::models::work_entry::WorkEntry;

/// Owner and creator are both "controllers" of an entry: either may
/// perform the self-service lifecycle actions on it.
pub fn is_controller(entry: &WorkEntry, actor: &User) -> bool {
    actor.id == entry.owner_user_id || actor.id == entry.creator_user_id
}

pub fn can_review(actor: &User) -> bool {
    actor.capabilities.can_review()
}

/// Require controller status for submit/withdraw/cancel/reactivate/
/// edit/delete/add-message.
pub fn assert_controller(entry: &WorkEntry, actor: &User, action: &str) -> AppResult<()> {
    if is_controller(entry, actor) {
        return Ok(());
    }
    Err(AppError::AuthorizationDenied(format!(
        "only the owner or creator of {} may {action} it",
        entry.entry_number
    )))
}

/// Require review capability AND that the actor controls neither side of
/// the entry. Capability alone is not enough: a reviewer who entered the
/// hours on someone's behalf must not decide on that entry, and
/// administrators are not exempt.
pub fn assert_review_eligible(entry: &WorkEntry, actor: &User) -> AppResult<()> {
    if !can_review(actor) {
        return Err(AppError::AuthorizationDenied(
            "review requires the reviewer or administrator capability".to_string(),
        ));
    }
    if actor.id == entry.owner_user_id || actor.id == entry.creator_user_id {
        return Err(AppError::SelfActionDenied(format!(
            "reviewers may not decide on their own entry {}",
            entry.entry_number
        )));
    }
    Ok(())
}

/// Post-approval corrections: review capability, not the owner, and the
/// entry must already be approved.
pub fn assert_correction_eligible(entry: &WorkEntry, actor: &User) -> AppResult<()> {
    if !can_review(actor) {
        return Err(AppError::AuthorizationDenied(
            "correction requires the reviewer or administrator capability".to_string(),
        ));
    }
    if actor.id == entry.owner_user_id {
        return Err(AppError::SelfActionDenied(format!(
            "owners may not correct their own entry {}",
            entry.entry_number
        )));
    }
    if entry.status != EntryStatus::Approved {
        return Err(AppError::ValidationFailed(format!(
            "only approved entries can be corrected ({} is {})",
            entry.entry_number, entry.status
        )));
    }
    Ok(())
}
