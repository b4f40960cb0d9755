//! Permission matrix
//!
//! The matrix materializes the policy into one boolean per
//! (role, module, action) cell so an administrator can review and adjust it
//! before saving. Edits stay local to the matrix until it is persisted.

use crate::error::{PolicyError, Result};
use crate::policy::PermissionPolicy;
use chapter_types::{Action, Module, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Address of one matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatrixCell {
    pub role: Role,
    pub module: Module,
    pub action: Action,
}

impl MatrixCell {
    pub fn new(module: Module, action: Action, role: Role) -> Self {
        Self {
            role,
            module,
            action,
        }
    }

    /// Every cell of the current catalogs, role-major
    pub fn all() -> impl Iterator<Item = MatrixCell> {
        Role::ALL.into_iter().flat_map(|role| {
            Module::ALL.into_iter().flat_map(move |module| {
                Action::ALL
                    .into_iter()
                    .map(move |action| MatrixCell::new(module, action, role))
            })
        })
    }

    pub fn total() -> usize {
        Role::ALL.len() * Module::ALL.len() * Action::ALL.len()
    }
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.role, self.module, self.action)
    }
}

/// Granted vs. total cell counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCount {
    pub granted: usize,
    pub total: usize,
}

impl CellCount {
    fn record(&mut self, granted: bool) {
        self.total += 1;
        if granted {
            self.granted += 1;
        }
    }
}

/// Summary counts over the current cell values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixStats {
    pub granted: usize,
    pub total: usize,
    pub per_role: BTreeMap<Role, CellCount>,
    pub per_module: BTreeMap<Module, CellCount>,
}

/// The full {role × module × action} table
#[derive(Debug, Clone)]
pub struct PermissionMatrix {
    policy: Arc<PermissionPolicy>,
    cells: BTreeMap<MatrixCell, bool>,
}

impl PermissionMatrix {
    /// Populate every cell from the policy
    pub fn build(policy: Arc<PermissionPolicy>) -> Self {
        let cells = derive_cells(&policy);
        Self { policy, cells }
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    /// Current value of one cell
    pub fn get(&self, module: Module, action: Action, role: Role) -> bool {
        self.cells
            .get(&MatrixCell::new(module, action, role))
            .copied()
            .unwrap_or(false)
    }

    /// Set one cell. Setting a cell to its current value changes nothing.
    pub fn toggle(&mut self, module: Module, action: Action, role: Role, value: bool) {
        let cell = MatrixCell::new(module, action, role);
        let previous = self.cells.insert(cell, value);
        if previous != Some(value) {
            debug!(cell = %cell, value, "Permission cell changed");
        }
    }

    /// Discard all edits and rebuild from the policy
    pub fn reset(&mut self) {
        self.cells = derive_cells(&self.policy);
        debug!("Permission matrix reset to policy");
    }

    /// Cells whose current value differs from the policy, with that value
    pub fn overrides(&self) -> BTreeMap<MatrixCell, bool> {
        self.cells
            .iter()
            .filter(|(cell, value)| {
                self.policy.evaluate(cell.module, cell.action, cell.role) != **value
            })
            .map(|(cell, value)| (*cell, *value))
            .collect()
    }

    /// Exactly one value per catalog triple
    pub fn is_complete(&self) -> bool {
        self.cells.len() == MatrixCell::total()
            && MatrixCell::all().all(|cell| self.cells.contains_key(&cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&MatrixCell, &bool)> {
        self.cells.iter()
    }

    /// Counts recomputed from the cells on every call
    pub fn stats(&self) -> MatrixStats {
        let mut stats = MatrixStats::default();
        for (cell, granted) in &self.cells {
            stats.total += 1;
            if *granted {
                stats.granted += 1;
            }
            stats.per_role.entry(cell.role).or_default().record(*granted);
            stats.per_module.entry(cell.module).or_default().record(*granted);
        }
        stats
    }

    /// Capture the current cells for persistence
    pub fn snapshot(&self, created_by: impl Into<String>, created_at: DateTime<Utc>) -> MatrixSnapshot {
        let cells: Vec<SnapshotCell> = self
            .cells
            .iter()
            .map(|(cell, granted)| SnapshotCell {
                cell: *cell,
                granted: *granted,
            })
            .collect();
        let content_hash = content_hash(&cells);
        MatrixSnapshot {
            created_by: created_by.into(),
            created_at,
            content_hash,
            cells,
        }
    }

    /// Rebuild a matrix from a snapshot.
    ///
    /// Cells missing from the snapshot (catalog entries added since it was
    /// taken) take their policy value and are returned alongside the matrix.
    pub fn from_snapshot(
        policy: Arc<PermissionPolicy>,
        snapshot: &MatrixSnapshot,
    ) -> Result<(Self, Vec<MatrixCell>)> {
        let computed = content_hash(&snapshot.cells);
        if computed != snapshot.content_hash {
            return Err(PolicyError::SnapshotHashMismatch {
                expected: snapshot.content_hash.clone(),
                computed,
            });
        }

        let mut seen = BTreeSet::new();
        let mut matrix = Self::build(policy);
        for entry in &snapshot.cells {
            if !seen.insert(entry.cell) {
                return Err(PolicyError::DuplicateCell(entry.cell.to_string()));
            }
            matrix.cells.insert(entry.cell, entry.granted);
        }

        let filled: Vec<MatrixCell> = MatrixCell::all().filter(|c| !seen.contains(c)).collect();
        if !filled.is_empty() {
            debug!(count = filled.len(), "Snapshot cells filled from policy");
        }
        Ok((matrix, filled))
    }
}

fn derive_cells(policy: &PermissionPolicy) -> BTreeMap<MatrixCell, bool> {
    MatrixCell::all()
        .map(|cell| (cell, policy.evaluate(cell.module, cell.action, cell.role)))
        .collect()
}

/// One saved cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCell {
    #[serde(flatten)]
    pub cell: MatrixCell,
    pub granted: bool,
}

/// Persistable copy of a matrix with a tamper-evident content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
    pub cells: Vec<SnapshotCell>,
}

/// blake3 over one `role|module|action|0/1` line per cell, in cell order
fn content_hash(cells: &[SnapshotCell]) -> String {
    let mut sorted: Vec<&SnapshotCell> = cells.iter().collect();
    sorted.sort_by_key(|c| c.cell);

    let mut hasher = blake3::Hasher::new();
    for entry in sorted {
        let line = format!(
            "{}|{}|{}|{}\n",
            entry.cell.role,
            entry.cell.module,
            entry.cell.action,
            u8::from(entry.granted)
        );
        hasher.update(line.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
