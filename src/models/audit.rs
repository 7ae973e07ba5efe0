use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue};
use serde::Serialize;

/// A typed field value inside an audit snapshot. Keeping snapshots as
/// ordered (name, typed value) pairs makes them introspectable without
/// re-running business logic.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Real(f64),
    Int(i64),
    Bool(bool),
    Null,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(s) => ToSqlOutput::Borrowed(s.as_str().into()),
            Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Int(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
        })
    }
}

/// Ordered before/after state recorded with every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fields: Vec<(String, Value)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize as a JSON object, preserving field order.
    pub fn to_json(&self) -> String {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            let v = match value {
                Value::Text(s) => serde_json::Value::String(s.clone()),
                Value::Real(f) => serde_json::json!(f),
                Value::Int(i) => serde_json::json!(i),
                Value::Bool(b) => serde_json::Value::Bool(*b),
                Value::Null => serde_json::Value::Null,
            };
            map.insert(name.clone(), v);
        }
        serde_json::Value::Object(map).to_string()
    }
}

/// One append-only audit row: who did what to which record, with a
/// human-readable description and a structured before/after diff.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub actor_user_id: Option<i64>,
    pub ip: Option<String>,
    pub action: String,
    pub table_name: String,
    pub record_id: i64,
    pub before: Option<Snapshot>,
    pub after: Option<Snapshot>,
    pub description: String,
    pub entry_number: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// An audit row as read back from the database (snapshots stay JSON).
#[derive(Debug, Clone)]
pub struct AuditLogEntry {
    pub id: i64,
    pub actor_user_id: Option<i64>,
    pub ip: Option<String>,
    pub action: String,
    pub table_name: String,
    pub record_id: i64,
    pub before_state: Option<String>,
    pub after_state: Option<String>,
    pub description: String,
    pub entry_number: Option<String>,
    pub metadata: Option<String>,
    pub created_at: String,
}
