use serde::Serialize;
use std::fmt;

/// Lifecycle state of a work entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EntryStatus {
    Draft,
    Submitted,
    Clarification,
    Approved,
    Rejected,
    Cancelled,
}

impl EntryStatus {
    /// Convert enum → DB string
    pub fn to_db_str(self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Submitted => "submitted",
            EntryStatus::Clarification => "clarification",
            EntryStatus::Approved => "approved",
            EntryStatus::Rejected => "rejected",
            EntryStatus::Cancelled => "cancelled",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(EntryStatus::Draft),
            "submitted" => Some(EntryStatus::Submitted),
            "clarification" => Some(EntryStatus::Clarification),
            "approved" => Some(EntryStatus::Approved),
            "rejected" => Some(EntryStatus::Rejected),
            "cancelled" => Some(EntryStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal states accept no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, EntryStatus::Approved | EntryStatus::Rejected)
    }

    pub fn is_draft(self) -> bool {
        matches!(self, EntryStatus::Draft)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
