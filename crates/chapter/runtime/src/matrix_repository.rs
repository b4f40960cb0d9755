//! Permission matrix snapshots in the document store.
//!
//! Each save writes a new snapshot document; nothing is overwritten. The
//! latest snapshot by creation time is the one restored.

use crate::error::{RuntimeError, RuntimeResult};
use chapter_policy::{MatrixCell, MatrixSnapshot, PermissionMatrix, PermissionPolicy};
use chapter_storage::{Clock, DocumentId, DocumentStore, Filter};
use std::sync::Arc;
use tracing::{debug, info};

/// Collection holding matrix snapshots
pub const DEFAULT_MATRIX_COLLECTION: &str = "permission_matrices";

/// A snapshot restored from the store
#[derive(Debug)]
pub struct LoadedMatrix {
    pub id: DocumentId,
    pub created_by: String,
    pub matrix: PermissionMatrix,
    /// Cells absent from the snapshot, filled from the policy
    pub filled: Vec<MatrixCell>,
}

pub struct MatrixRepository {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    collection: String,
}

impl MatrixRepository {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            collection: DEFAULT_MATRIX_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Save the current matrix as a new snapshot
    pub async fn save(
        &self,
        matrix: &PermissionMatrix,
        created_by: &str,
    ) -> RuntimeResult<DocumentId> {
        let snapshot = matrix.snapshot(created_by, self.clock.now());
        let body = serde_json::to_value(&snapshot)?;
        let id = self.store.create(&self.collection, None, body).await?;

        info!(
            id = %id,
            created_by,
            hash = %snapshot.content_hash,
            overrides = matrix.overrides().len(),
            "Permission matrix saved"
        );
        Ok(id)
    }

    /// Restore the most recent snapshot, if any
    pub async fn load_latest(
        &self,
        policy: Arc<PermissionPolicy>,
    ) -> RuntimeResult<Option<LoadedMatrix>> {
        let docs = self.store.query(&self.collection, &Filter::All).await?;

        let mut latest: Option<(DocumentId, MatrixSnapshot)> = None;
        for doc in docs {
            let snapshot: MatrixSnapshot =
                serde_json::from_value(doc.body).map_err(|source| RuntimeError::Decode {
                    collection: self.collection.clone(),
                    id: doc.id.clone(),
                    source,
                })?;
            let newer = latest
                .as_ref()
                .map_or(true, |(_, current)| snapshot.created_at > current.created_at);
            if newer {
                latest = Some((doc.id, snapshot));
            }
        }

        let Some((id, snapshot)) = latest else {
            debug!(collection = %self.collection, "No permission matrix saved");
            return Ok(None);
        };

        let (matrix, filled) = PermissionMatrix::from_snapshot(policy, &snapshot)?;
        info!(
            id = %id,
            created_by = %snapshot.created_by,
            filled = filled.len(),
            "Permission matrix loaded"
        );
        Ok(Some(LoadedMatrix {
            id,
            created_by: snapshot.created_by,
            matrix,
            filled,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapter_storage::{FixedClock, InMemoryDocumentStore};
    use chapter_types::{Action, Module, Role};
    use chrono::{TimeZone, Utc};

    fn repo_at(store: Arc<InMemoryDocumentStore>, hour: u32) -> MatrixRepository {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap());
        MatrixRepository::new(store, Arc::new(clock))
    }

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let repo = repo_at(Arc::new(InMemoryDocumentStore::new()), 9);
        let loaded = repo
            .load_latest(Arc::new(PermissionPolicy::standard()))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_latest_snapshot_wins() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let policy = Arc::new(PermissionPolicy::standard());

        let mut later = PermissionMatrix::build(policy.clone());
        later.toggle(Module::FinanceManagement, Action::Read, Role::ALUMNI, true);
        repo_at(store.clone(), 15).save(&later, "secretary").await.unwrap();

        let earlier = PermissionMatrix::build(policy.clone());
        repo_at(store.clone(), 8).save(&earlier, "president").await.unwrap();

        let loaded = repo_at(store.clone(), 16)
            .load_latest(policy)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.created_by, "secretary");
        assert!(loaded.filled.is_empty());
        assert!(loaded
            .matrix
            .get(Module::FinanceManagement, Action::Read, Role::ALUMNI));
        assert_eq!(store.count(DEFAULT_MATRIX_COLLECTION).await, 2);
    }

    #[tokio::test]
    async fn test_tampered_snapshot_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let policy = Arc::new(PermissionPolicy::standard());
        let repo = repo_at(store.clone(), 9);
        let id = repo
            .save(&PermissionMatrix::build(policy.clone()), "president")
            .await
            .unwrap();

        store
            .update(
                DEFAULT_MATRIX_COLLECTION,
                &id,
                serde_json::json!({"content_hash": "0000"}),
            )
            .await
            .unwrap();

        let err = repo.load_latest(policy).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Policy(_)));
    }
}
