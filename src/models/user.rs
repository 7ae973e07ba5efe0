use serde::Serialize;

/// A single grant a user can hold. Review rights come from a capability,
/// never from being the owner/creator of an entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Capability {
    Member,
    Reviewer,
    Administrator,
}

impl Capability {
    pub fn to_db_str(self) -> &'static str {
        match self {
            Capability::Member => "member",
            Capability::Reviewer => "reviewer",
            Capability::Administrator => "administrator",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Capability::Member),
            "reviewer" => Some(Capability::Reviewer),
            "administrator" => Some(Capability::Administrator),
            _ => None,
        }
    }
}

/// The set of capabilities a user holds, stored as a comma-joined
/// list in the `users` table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct CapabilitySet {
    caps: Vec<Capability>,
}

impl CapabilitySet {
    pub fn new(mut caps: Vec<Capability>) -> Self {
        caps.dedup();
        Self { caps }
    }

    pub fn has(&self, cap: Capability) -> bool {
        self.caps.contains(&cap)
    }

    /// Reviewer or administrator may review entries they do not control.
    pub fn can_review(&self) -> bool {
        self.has(Capability::Reviewer) || self.has(Capability::Administrator)
    }

    pub fn is_administrator(&self) -> bool {
        self.has(Capability::Administrator)
    }

    pub fn to_db_str(&self) -> String {
        self.caps
            .iter()
            .map(|c| c.to_db_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        let mut caps = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            caps.push(Capability::from_db_str(part)?);
        }
        Some(Self::new(caps))
    }
}

/// A club member as stored in the user directory.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub capabilities: CapabilitySet,
    pub created_at: String, // ISO 8601
}

/// The acting user for one request, plus the source address recorded
/// in the audit trail. The CLI leaves `ip` empty; a web layer fills it.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub ip: Option<String>,
}

impl Actor {
    pub fn new(user: User) -> Self {
        Self { user, ip: None }
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }
}
