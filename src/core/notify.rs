//! Best-effort notification delivery.
//!
//! The engine treats every notifier call as optional: a failure is
//! reported through the usual warning channel and never changes the
//! outcome of the operation that triggered it.

use crate::errors::AppResult;
use crate::ui::messages::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    EntrySubmitted,
    EntryApproved,
    EntryRejected,
    EntryReturned,
    EntryCorrected,
}

impl NotificationEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationEvent::EntrySubmitted => "entry_submitted",
            NotificationEvent::EntryApproved => "entry_approved",
            NotificationEvent::EntryRejected => "entry_rejected",
            NotificationEvent::EntryReturned => "entry_returned",
            NotificationEvent::EntryCorrected => "entry_corrected",
        }
    }
}

/// Template data handed to the notifier.
#[derive(Debug, Clone, Default)]
pub struct NotificationPayload {
    pub entry_number: String,
    pub hours: f64,
    pub work_date: String,
    pub reason: Option<String>,
    pub old_hours: Option<f64>,
    pub new_hours: Option<f64>,
}

/// Delivery contract. Implementations may fail; the engine absorbs it.
pub trait Notifier {
    fn notify(
        &self,
        event: NotificationEvent,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> AppResult<()>;
}

/// Prints notifications to the terminal. Stands in for the mail
/// delivery a server deployment would plug in here.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(
        &self,
        event: NotificationEvent,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> AppResult<()> {
        let mut line = format!("[{}] {} -> {}", event.as_str(), payload.entry_number, recipient);
        if let Some(reason) = &payload.reason {
            line.push_str(&format!(" ({reason})"));
        }
        if let (Some(old), Some(new)) = (payload.old_hours, payload.new_hours) {
            line.push_str(&format!(" [{old} -> {new} h]"));
        }
        info(line);
        Ok(())
    }
}

/// Swallows everything. Useful for scripting and tests.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(
        &self,
        _event: NotificationEvent,
        _recipient: &str,
        _payload: &NotificationPayload,
    ) -> AppResult<()> {
        Ok(())
    }
}
