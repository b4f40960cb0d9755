use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a document within its collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored document: its id plus an arbitrary JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub body: Value,
}

/// Query predicate over document bodies.
///
/// Field names address top-level keys; a dotted name walks nested objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Filter {
    /// Matches every document
    All,
    /// Field equals the value
    Eq { field: String, value: Value },
    /// String field within `[from, to]`, compared lexically (ISO dates sort correctly)
    Range { field: String, from: String, to: String },
    /// Every inner filter matches
    And { filters: Vec<Filter> },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn range(field: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Filter::Range {
            field: field.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    pub fn matches(&self, body: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => lookup(body, field) == Some(value),
            Filter::Range { field, from, to } => match lookup(body, field).and_then(Value::as_str) {
                Some(s) => s >= from.as_str() && s <= to.as_str(),
                None => false,
            },
            Filter::And { filters } => filters.iter().all(|f| f.matches(body)),
        }
    }
}

fn lookup<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    field
        .split('.')
        .try_fold(body, |value, key| value.as_object()?.get(key))
}
