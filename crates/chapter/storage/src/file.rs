//! JSON-file document store.
//!
//! The whole store lives in one JSON file that is rewritten after every
//! mutation (write to a sibling temp file, then rename). A mutation is
//! applied to a copy of the collections and becomes visible only once the
//! file write succeeds. Suitable for a single operator; there is no
//! cross-process locking.

use crate::memory::Collections;
use crate::model::{Document, DocumentId, Filter};
use crate::traits::DocumentStore;
use crate::StorageResult;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Document store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileDocumentStore {
    path: PathBuf,
    collections: RwLock<Collections>,
}

impl JsonFileDocumentStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Collections::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "Opened document store file");
        Ok(Self {
            path,
            collections: RwLock::new(collections),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, collections: &Collections) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(collections)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `mutate` to a copy, persist it, then publish it.
    async fn commit<T, F>(&self, mutate: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Collections) -> StorageResult<T> + Send,
        T: Send,
    {
        let mut guard = self.collections.write().await;
        let mut next = guard.clone();
        let out = mutate(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
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
        self.commit(|c| Ok(c.create(collection, key, body))).await
    }

    async fn update(&self, collection: &str, id: &DocumentId, partial: Value) -> StorageResult<()> {
        self.commit(|c| c.update(collection, id, partial)).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StorageResult<bool> {
        if self.collections.read().await.get(collection, id).is_none() {
            return Ok(false);
        }
        self.commit(|c| Ok(c.delete(collection, id))).await
    }
}
