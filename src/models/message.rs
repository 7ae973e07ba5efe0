use serde::Serialize;

/// Kind of a conversation message attached to an entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MessageKind {
    Comment,
    Question,
}

impl MessageKind {
    pub fn to_db_str(self) -> &'static str {
        match self {
            MessageKind::Comment => "comment",
            MessageKind::Question => "question",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "comment" => Some(MessageKind::Comment),
            "question" => Some(MessageKind::Question),
            _ => None,
        }
    }
}

/// One row of the per-entry conversation log. This log is separate from
/// the audit trail: it is user-facing dialogue, not a mutation record.
#[derive(Debug, Clone, Serialize)]
pub struct EntryMessage {
    pub id: i64,
    pub entry_id: i64,
    pub author_user_id: i64,
    pub kind: MessageKind,
    pub body: String,
    pub created_at: String,
}
