//! Workflow engine for work entries.
//!
//! Every operation follows the same shape: validate the transition,
//! validate authorization, validate operation-specific preconditions,
//! then write through a compare-and-swap at the version the caller
//! read. The entity write and its audit row share one transaction;
//! notifications happen after commit and are best-effort only.
//!
//! Operations take a pre-loaded [`WorkEntry`] snapshot. The snapshot's
//! version is the CAS expectation, so a competitor that commits first
//! surfaces here as `ConcurrencyConflict`, not as a silent overwrite.

use crate::core::guard;
use crate::core::notify::{NotificationEvent, NotificationPayload, Notifier};
use crate::core::state_machine::ensure_transition;
use crate::db::entry_store::{self, NewEntry};
use crate::db::pool::DbPool;
use crate::db::{audit_sink, messages, users};
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditRecord, Snapshot, Value};
use crate::models::message::MessageKind;
use crate::models::status::EntryStatus;
use crate::models::user::{Actor, Capability};
use crate::models::work_entry::{WorkEntry, validate_hours, validate_reason};
use crate::ui::messages::warning;
use chrono::Utc;

const ENTRIES_TABLE: &str = "work_entries";

/// Optional changes applied to a draft entry.
#[derive(Debug, Default)]
pub struct DraftPatch {
    pub category: Option<String>,
    pub work_date: Option<chrono::NaiveDate>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub hours: Option<f64>,
    pub project: Option<String>,
    pub description: Option<String>,
}

pub struct WorkflowEngine<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> WorkflowEngine<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    // ------------------------------------------------------------------
    // Draft creation and self-service maintenance
    // ------------------------------------------------------------------

    /// Insert a new draft entry. The actor becomes the creator; the
    /// owner may differ ("entered on behalf of").
    pub fn create_draft(
        &self,
        pool: &mut DbPool,
        actor: &Actor,
        new: &NewEntry,
    ) -> AppResult<WorkEntry> {
        validate_hours(new.hours)?;
        if new.category.trim().is_empty() {
            return Err(AppError::ValidationFailed("category must not be blank".to_string()));
        }
        users::require_by_id(&pool.conn, new.owner_user_id)?;

        let tx = pool.conn.transaction()?;
        let (id, entry_number) = entry_store::insert_draft(&tx, new)?;

        let after = Snapshot::new()
            .field("status", EntryStatus::Draft.to_db_str())
            .field("owner_user_id", new.owner_user_id)
            .field("creator_user_id", new.creator_user_id)
            .field("category", new.category)
            .field("work_date", new.work_date.format("%Y-%m-%d").to_string())
            .field("hours", new.hours);
        audit_sink::append(
            &tx,
            &AuditRecord {
                actor_user_id: Some(actor.id()),
                ip: actor.ip.clone(),
                action: "created".to_string(),
                table_name: ENTRIES_TABLE.to_string(),
                record_id: id,
                before: None,
                after: Some(after),
                description: format!(
                    "created draft entry {entry_number} ({} h on {})",
                    new.hours, new.work_date
                ),
                entry_number: Some(entry_number.clone()),
                metadata: None,
            },
        )?;
        tx.commit()?;

        entry_store::get_by_id(&pool.conn, id)?.ok_or(AppError::EntryNotFound(id))
    }

    /// Update draft fields. Controller-only and draft-only.
    pub fn edit_draft(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        patch: &DraftPatch,
    ) -> AppResult<WorkEntry> {
        guard::assert_controller(entry, &actor.user, "edit")?;
        if entry.status != EntryStatus::Draft {
            return Err(AppError::ValidationFailed(format!(
                "only draft entries can be edited ({} is {})",
                entry.entry_number, entry.status
            )));
        }

        let mut fields: Vec<(&'static str, Value)> = Vec::new();
        let mut before = Snapshot::new();
        let mut after = Snapshot::new();

        if let Some(hours) = patch.hours {
            validate_hours(hours)?;
            fields.push(("hours", hours.into()));
            before = before.field("hours", entry.hours);
            after = after.field("hours", hours);
        }
        if let Some(category) = &patch.category {
            fields.push(("category", category.as_str().into()));
            before = before.field("category", entry.category.as_str());
            after = after.field("category", category.as_str());
        }
        if let Some(date) = patch.work_date {
            let date_str = date.format("%Y-%m-%d").to_string();
            fields.push(("work_date", date_str.clone().into()));
            before = before.field("work_date", entry.date_str());
            after = after.field("work_date", date_str);
        }
        if let Some(time_from) = &patch.time_from {
            fields.push(("time_from", time_from.as_str().into()));
            before = before.field("time_from", entry.time_from.as_deref());
            after = after.field("time_from", time_from.as_str());
        }
        if let Some(time_to) = &patch.time_to {
            fields.push(("time_to", time_to.as_str().into()));
            before = before.field("time_to", entry.time_to.as_deref());
            after = after.field("time_to", time_to.as_str());
        }
        if let Some(project) = &patch.project {
            fields.push(("project", project.as_str().into()));
            before = before.field("project", entry.project.as_str());
            after = after.field("project", project.as_str());
        }
        if let Some(description) = &patch.description {
            fields.push(("description", description.as_str().into()));
            before = before.field("description", entry.description.as_str());
            after = after.field("description", description.as_str());
        }

        if fields.is_empty() {
            return Err(AppError::ValidationFailed("nothing to update".to_string()));
        }

        self.apply_update(
            pool,
            entry,
            actor,
            fields,
            "updated",
            format!("updated draft entry {}", entry.entry_number),
            before,
            after,
            None,
            None,
        )
    }

    /// Soft-delete a draft entry. Deleted entries never re-enter the
    /// active set.
    pub fn soft_delete(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
    ) -> AppResult<()> {
        guard::assert_controller(entry, &actor.user, "delete")?;
        if entry.status != EntryStatus::Draft {
            return Err(AppError::ValidationFailed(format!(
                "only draft entries can be deleted ({} is {})",
                entry.entry_number, entry.status
            )));
        }

        let now = Utc::now().to_rfc3339();
        let tx = pool.conn.transaction()?;
        let swapped = entry_store::compare_and_swap(
            &tx,
            entry.id,
            entry.version,
            &[("deleted_at", now.as_str().into())],
        )?;
        if !swapped {
            return Err(self.cas_failure(&tx, entry)?);
        }
        audit_sink::append(
            &tx,
            &AuditRecord {
                actor_user_id: Some(actor.id()),
                ip: actor.ip.clone(),
                action: "deleted".to_string(),
                table_name: ENTRIES_TABLE.to_string(),
                record_id: entry.id,
                before: Some(Snapshot::new().field("deleted_at", Value::Null)),
                after: Some(Snapshot::new().field("deleted_at", now.as_str())),
                description: format!("deleted draft entry {}", entry.entry_number),
                entry_number: Some(entry.entry_number.clone()),
                metadata: None,
            },
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Append a comment to the entry conversation log. Controller-only;
    /// no version bump, the entry row itself is untouched.
    pub fn add_message(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        body: &str,
    ) -> AppResult<i64> {
        guard::assert_controller(entry, &actor.user, "comment on")?;
        validate_reason(body, "message")?;

        let tx = pool.conn.transaction()?;
        let id = messages::append_message(&tx, entry.id, actor.id(), MessageKind::Comment, body)?;
        audit_sink::append(
            &tx,
            &AuditRecord {
                actor_user_id: Some(actor.id()),
                ip: actor.ip.clone(),
                action: "message_added".to_string(),
                table_name: "entry_messages".to_string(),
                record_id: id,
                before: None,
                after: Some(Snapshot::new().field("kind", "comment").field("body", body)),
                description: format!("added comment to entry {}", entry.entry_number),
                entry_number: Some(entry.entry_number.clone()),
                metadata: None,
            },
        )?;
        tx.commit()?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Lifecycle: controller actions
    // ------------------------------------------------------------------

    /// draft → submitted. Notifies every reviewer-capable user except
    /// the actor, one failure never blocking the next recipient.
    pub fn submit(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
    ) -> AppResult<WorkEntry> {
        ensure_transition(entry.status, EntryStatus::Submitted)?;
        guard::assert_controller(entry, &actor.user, "submit")?;

        let now = Utc::now().to_rfc3339();
        let updated = self.apply_update(
            pool,
            entry,
            actor,
            vec![
                ("status", EntryStatus::Submitted.to_db_str().into()),
                ("submitted_at", now.as_str().into()),
            ],
            "status_change",
            format!(
                "submitted entry {} ({} -> submitted)",
                entry.entry_number, entry.status
            ),
            Snapshot::new().field("status", entry.status.to_db_str()),
            Snapshot::new()
                .field("status", EntryStatus::Submitted.to_db_str())
                .field("submitted_at", now.as_str()),
            None,
            None,
        )?;

        let payload = self.payload_for(&updated, None);
        match users::find_by_capability(&pool.conn, Capability::Reviewer) {
            Ok(reviewers) => {
                for reviewer in reviewers {
                    if reviewer.id == actor.id() {
                        continue;
                    }
                    self.notify_quietly(NotificationEvent::EntrySubmitted, &reviewer.email, &payload);
                }
            }
            Err(e) => warning(format!(
                "Could not resolve reviewers for {}: {}",
                updated.entry_number, e
            )),
        }

        Ok(updated)
    }

    /// submitted | clarification → draft.
    pub fn withdraw(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
    ) -> AppResult<WorkEntry> {
        self.controller_transition(pool, entry, actor, EntryStatus::Draft, "withdrew")
    }

    /// submitted | clarification → cancelled.
    pub fn cancel(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
    ) -> AppResult<WorkEntry> {
        self.controller_transition(pool, entry, actor, EntryStatus::Cancelled, "cancelled")
    }

    /// cancelled → draft.
    pub fn reactivate(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
    ) -> AppResult<WorkEntry> {
        self.controller_transition(pool, entry, actor, EntryStatus::Draft, "reactivated")
    }

    // ------------------------------------------------------------------
    // Lifecycle: review actions
    // ------------------------------------------------------------------

    /// submitted | clarification → approved. Notifies the owner.
    pub fn approve(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
    ) -> AppResult<WorkEntry> {
        ensure_transition(entry.status, EntryStatus::Approved)?;
        guard::assert_review_eligible(entry, &actor.user)?;

        let now = Utc::now().to_rfc3339();
        let updated = self.apply_update(
            pool,
            entry,
            actor,
            vec![
                ("status", EntryStatus::Approved.to_db_str().into()),
                ("reviewer_user_id", actor.id().into()),
                ("reviewed_at", now.as_str().into()),
            ],
            "status_change",
            format!(
                "approved entry {} ({} -> approved)",
                entry.entry_number, entry.status
            ),
            Snapshot::new().field("status", entry.status.to_db_str()),
            Snapshot::new()
                .field("status", EntryStatus::Approved.to_db_str())
                .field("reviewer_user_id", actor.id()),
            None,
            None,
        )?;

        self.notify_owner(pool, &updated, NotificationEvent::EntryApproved, None);
        Ok(updated)
    }

    /// submitted | clarification → rejected. Reason required; owner
    /// notified with it.
    pub fn reject(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        reason: &str,
    ) -> AppResult<WorkEntry> {
        ensure_transition(entry.status, EntryStatus::Rejected)?;
        guard::assert_review_eligible(entry, &actor.user)?;
        validate_reason(reason, "rejection")?;

        let now = Utc::now().to_rfc3339();
        let updated = self.apply_update(
            pool,
            entry,
            actor,
            vec![
                ("status", EntryStatus::Rejected.to_db_str().into()),
                ("reviewer_user_id", actor.id().into()),
                ("reviewed_at", now.as_str().into()),
                ("rejection_reason", reason.into()),
            ],
            "status_change",
            format!(
                "rejected entry {} ({} -> rejected): {reason}",
                entry.entry_number, entry.status
            ),
            Snapshot::new().field("status", entry.status.to_db_str()),
            Snapshot::new()
                .field("status", EntryStatus::Rejected.to_db_str())
                .field("rejection_reason", reason),
            None,
            None,
        )?;

        self.notify_owner(pool, &updated, NotificationEvent::EntryRejected, Some(reason));
        Ok(updated)
    }

    /// submitted → clarification. Reason required; a tagged question is
    /// appended to the conversation log in the same transaction, and
    /// the owner is notified with the reason.
    pub fn return_for_revision(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        reason: &str,
    ) -> AppResult<WorkEntry> {
        if entry.status != EntryStatus::Submitted {
            return Err(AppError::InvalidTransition {
                from: entry.status.to_db_str().to_string(),
                to: EntryStatus::Clarification.to_db_str().to_string(),
            });
        }
        guard::assert_review_eligible(entry, &actor.user)?;
        validate_reason(reason, "return")?;

        let updated = self.apply_update(
            pool,
            entry,
            actor,
            vec![
                ("status", EntryStatus::Clarification.to_db_str().into()),
                ("return_reason", reason.into()),
            ],
            "status_change",
            format!(
                "returned entry {} for revision (submitted -> clarification): {reason}",
                entry.entry_number
            ),
            Snapshot::new().field("status", entry.status.to_db_str()),
            Snapshot::new()
                .field("status", EntryStatus::Clarification.to_db_str())
                .field("return_reason", reason),
            None,
            Some(reason),
        )?;

        self.notify_owner(pool, &updated, NotificationEvent::EntryReturned, Some(reason));
        Ok(updated)
    }

    /// Post-approval hour correction; status stays approved. The first
    /// correction pins `original_hours`, later ones never move it.
    pub fn correct(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        new_hours: f64,
        reason: &str,
    ) -> AppResult<WorkEntry> {
        guard::assert_correction_eligible(entry, &actor.user)?;
        validate_reason(reason, "correction")?;
        validate_hours(new_hours)?;

        let now = Utc::now().to_rfc3339();
        let mut fields: Vec<(&'static str, Value)> = vec![
            ("hours", new_hours.into()),
            ("is_corrected", true.into()),
            ("corrected_by_user_id", actor.id().into()),
            ("corrected_at", now.as_str().into()),
            ("correction_reason", reason.into()),
        ];
        // Baseline is set exactly once, by the first correction.
        if !entry.is_corrected {
            fields.push(("original_hours", entry.hours.into()));
        }

        let old_hours = entry.hours;
        let updated = self.apply_update(
            pool,
            entry,
            actor,
            fields,
            "correction",
            format!(
                "corrected entry {}: {old_hours} -> {new_hours} h ({reason})",
                entry.entry_number
            ),
            Snapshot::new()
                .field("hours", old_hours)
                .field("is_corrected", entry.is_corrected),
            Snapshot::new()
                .field("hours", new_hours)
                .field("is_corrected", true)
                .field("original_hours", entry.baseline_hours())
                .field("correction_reason", reason),
            Some(serde_json::json!({ "old_hours": old_hours, "new_hours": new_hours })),
            None,
        )?;

        let mut payload = self.payload_for(&updated, Some(reason));
        payload.old_hours = Some(old_hours);
        payload.new_hours = Some(new_hours);
        match users::find_by_id(&pool.conn, updated.owner_user_id) {
            Ok(Some(owner)) => {
                self.notify_quietly(NotificationEvent::EntryCorrected, &owner.email, &payload)
            }
            _ => warning(format!(
                "Could not resolve owner of {} for notification",
                updated.entry_number
            )),
        }

        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    /// Shared path for withdraw/cancel/reactivate: controller-gated
    /// status change with no extra fields and no notification.
    fn controller_transition(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        to: EntryStatus,
        verb: &str,
    ) -> AppResult<WorkEntry> {
        ensure_transition(entry.status, to)?;
        guard::assert_controller(entry, &actor.user, verb)?;

        self.apply_update(
            pool,
            entry,
            actor,
            vec![("status", to.to_db_str().into())],
            "status_change",
            format!("{verb} entry {} ({} -> {to})", entry.entry_number, entry.status),
            Snapshot::new().field("status", entry.status.to_db_str()),
            Snapshot::new().field("status", to.to_db_str()),
            None,
            None,
        )
    }

    /// The transactional core every mutation goes through: CAS write at
    /// the snapshot's version, optional question message, exactly one
    /// audit row, all in one transaction. On CAS failure nothing is written.
    #[allow(clippy::too_many_arguments)]
    fn apply_update(
        &self,
        pool: &mut DbPool,
        entry: &WorkEntry,
        actor: &Actor,
        fields: Vec<(&'static str, Value)>,
        action: &str,
        description: String,
        before: Snapshot,
        after: Snapshot,
        metadata: Option<serde_json::Value>,
        question: Option<&str>,
    ) -> AppResult<WorkEntry> {
        let tx = pool.conn.transaction()?;

        let swapped = entry_store::compare_and_swap(&tx, entry.id, entry.version, &fields)?;
        if !swapped {
            return Err(self.cas_failure(&tx, entry)?);
        }

        if let Some(body) = question {
            messages::append_message(&tx, entry.id, actor.id(), MessageKind::Question, body)?;
        }

        audit_sink::append(
            &tx,
            &AuditRecord {
                actor_user_id: Some(actor.id()),
                ip: actor.ip.clone(),
                action: action.to_string(),
                table_name: ENTRIES_TABLE.to_string(),
                record_id: entry.id,
                before: Some(before),
                after: Some(after),
                description,
                entry_number: Some(entry.entry_number.clone()),
                metadata,
            },
        )?;

        tx.commit()?;

        entry_store::get_by_id(&pool.conn, entry.id)?.ok_or(AppError::EntryNotFound(entry.id))
    }

    /// Zero rows from a CAS: either the version moved or the row left
    /// the active set. Distinguish the two for the caller.
    fn cas_failure(
        &self,
        conn: &rusqlite::Connection,
        entry: &WorkEntry,
    ) -> AppResult<AppError> {
        if entry_store::exists(conn, entry.id)? {
            Ok(AppError::ConcurrencyConflict {
                entry_number: entry.entry_number.clone(),
                expected: entry.version,
            })
        } else {
            Ok(AppError::EntryNotFound(entry.id))
        }
    }

    fn payload_for(&self, entry: &WorkEntry, reason: Option<&str>) -> NotificationPayload {
        NotificationPayload {
            entry_number: entry.entry_number.clone(),
            hours: entry.hours,
            work_date: entry.date_str(),
            reason: reason.map(|r| r.to_string()),
            old_hours: None,
            new_hours: None,
        }
    }

    /// Resolve the owner and notify them; any failure is absorbed.
    fn notify_owner(
        &self,
        pool: &DbPool,
        entry: &WorkEntry,
        event: NotificationEvent,
        reason: Option<&str>,
    ) {
        let payload = self.payload_for(entry, reason);
        match users::find_by_id(&pool.conn, entry.owner_user_id) {
            Ok(Some(owner)) => self.notify_quietly(event, &owner.email, &payload),
            _ => warning(format!(
                "Could not resolve owner of {} for notification",
                entry.entry_number
            )),
        }
    }

    fn notify_quietly(
        &self,
        event: NotificationEvent,
        recipient: &str,
        payload: &NotificationPayload,
    ) {
        if let Err(e) = self.notifier.notify(event, recipient, payload) {
            warning(format!(
                "Notification {} to {} failed: {}",
                event.as_str(),
                recipient,
                e
            ));
        }
    }
}
