//! In-memory reference implementations.
//!
//! These adapters are deterministic and test-friendly: query results are
//! ordered by document id and generated ids are only used when no key is
//! supplied.

use crate::model::{Document, DocumentId, Filter};
use crate::traits::{DocumentStore, MemberDirectory};
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use chapter_types::Member;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Collection name -> id -> body. Shared by the in-memory and file backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Collections(BTreeMap<String, BTreeMap<DocumentId, Value>>);

impl Collections {
    pub(crate) fn get(&self, collection: &str, id: &DocumentId) -> Option<Document> {
        self.0
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|body| Document {
                id: id.clone(),
                body: body.clone(),
            })
    }

    pub(crate) fn query(&self, collection: &str, filter: &Filter) -> Vec<Document> {
        self.0
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, body)| filter.matches(body))
                    .map(|(id, body)| Document {
                        id: id.clone(),
                        body: body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn create(
        &mut self,
        collection: &str,
        key: Option<DocumentId>,
        body: Value,
    ) -> DocumentId {
        let id = key.unwrap_or_else(DocumentId::generate);
        self.0
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), body);
        id
    }

    pub(crate) fn update(
        &mut self,
        collection: &str,
        id: &DocumentId,
        partial: Value,
    ) -> StorageResult<()> {
        let Value::Object(fields) = partial else {
            return Err(StorageError::InvalidInput(
                "partial update must be a JSON object".to_string(),
            ));
        };
        let body = self
            .0
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", collection, id)))?;
        let target = body.as_object_mut().ok_or_else(|| {
            StorageError::InvalidInput(format!("{}/{} is not a JSON object", collection, id))
        })?;
        for (key, value) in fields {
            target.insert(key, value);
        }
        Ok(())
    }

    pub(crate) fn delete(&mut self, collection: &str, id: &DocumentId) -> bool {
        self.0
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false)
    }
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let guard = self.collections.read().await;
        guard.0.get(collection).map(|docs| docs.len()).unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &DocumentId) -> StorageResult<Option<Document>> {
        let guard = self.collections.read().await;
        Ok(guard.get(collection, id))
    }

    async fn query(&self, collection: &str, filter: &Filter) -> StorageResult<Vec<Document>> {
        let guard = self.collections.read().await;
        Ok(guard.query(collection, filter))
    }

    async fn create(
        &self,
        collection: &str,
        key: Option<DocumentId>,
        body: Value,
    ) -> StorageResult<DocumentId> {
        let mut guard = self.collections.write().await;
        Ok(guard.create(collection, key, body))
    }

    async fn update(&self, collection: &str, id: &DocumentId, partial: Value) -> StorageResult<()> {
        let mut guard = self.collections.write().await;
        guard.update(collection, id, partial)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StorageResult<bool> {
        let mut guard = self.collections.write().await;
        Ok(guard.delete(collection, id))
    }
}

/// Member directory backed by a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticMemberDirectory {
    members: Vec<Member>,
}

impl StaticMemberDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl MemberDirectory for StaticMemberDirectory {
    async fn list_members(&self) -> StorageResult<Vec<Member>> {
        Ok(self.members.clone())
    }
}
