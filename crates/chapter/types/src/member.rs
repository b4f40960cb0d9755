//! Member references and seat occupancy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference into the member directory
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directory entry used to resolve display names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
        }
    }
}

/// Occupancy of a single seat
///
/// `Unassigned` takes part in no uniqueness check: any number of seats may be
/// left open in the same term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "member")]
pub enum Slot {
    Assigned(MemberId),
    #[default]
    Unassigned,
}

impl Slot {
    pub fn assigned(id: impl Into<String>) -> Self {
        Slot::Assigned(MemberId::new(id))
    }

    /// Interpret raw form input. Blank input and the literal `unassigned`
    /// (any case) leave the seat open.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unassigned") {
            Slot::Unassigned
        } else {
            Slot::Assigned(MemberId::new(trimmed))
        }
    }

    pub fn member(&self) -> Option<&MemberId> {
        match self {
            Slot::Assigned(id) => Some(id),
            Slot::Unassigned => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Slot::Assigned(_))
    }
}

impl From<Option<MemberId>> for Slot {
    fn from(member: Option<MemberId>) -> Self {
        member.map_or(Slot::Unassigned, Slot::Assigned)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Assigned(id) => write!(f, "{}", id),
            Slot::Unassigned => f.write_str("unassigned"),
        }
    }
}
