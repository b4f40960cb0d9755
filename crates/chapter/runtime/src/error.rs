use crate::validator::ValidationReport;
use chapter_policy::PolicyError;
use chapter_storage::{DocumentId, StorageError};
use chapter_types::{CatalogError, MemberId, PositionCode};
use serde::Serialize;
use std::fmt;

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Validation(#[from] ValidationReport),

    #[error(transparent)]
    Store(#[from] StoreFailure),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid document {collection}/{id}: {source}")]
    Decode {
        collection: String,
        id: DocumentId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// One store call issued while replacing a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum StoreStep {
    /// Lookup of the assignments already stored for the year
    Query { year: i32 },
    Delete { id: DocumentId },
    Create {
        id: DocumentId,
        position: PositionCode,
        member: MemberId,
    },
}

impl fmt::Display for StoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStep::Query { year } => write!(f, "query assignments for {}", year),
            StoreStep::Delete { id } => write!(f, "delete {}", id),
            StoreStep::Create {
                position, member, ..
            } => write!(f, "create {} for {}", position, member),
        }
    }
}

/// A term save that stopped part way.
///
/// `completed` lists every store call that succeeded before `failed`, in
/// issue order. Nothing after `failed` was attempted and nothing was rolled
/// back; saving the same term again converges.
#[derive(Debug, thiserror::Error)]
#[error("Term save stopped at '{failed}' after {} completed step(s): {source}", .completed.len())]
pub struct StoreFailure {
    pub year: i32,
    pub failed: StoreStep,
    pub completed: Vec<StoreStep>,
    #[source]
    pub source: StorageError,
}
