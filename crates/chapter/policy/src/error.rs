//! Error types for rule tables and matrix snapshots

use thiserror::Error;

/// Policy configuration errors
///
/// Evaluation itself never fails; these only arise when loading rule tables
/// or restoring saved matrices.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Rule table could not be decoded
    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(#[from] serde_json::Error),

    /// Snapshot content does not match its recorded hash
    #[error("Matrix snapshot hash mismatch: expected {expected}, computed {computed}")]
    SnapshotHashMismatch { expected: String, computed: String },

    /// Snapshot lists the same cell twice
    #[error("Matrix snapshot has duplicate cell: {0}")]
    DuplicateCell(String),
}

/// Result type for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;
