use crate::model::{Document, DocumentId, Filter};
use crate::StorageResult;
use async_trait::async_trait;
use chapter_types::Member;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Plain document database.
///
/// Each call is atomic on its own; there is no way to group calls into a
/// transaction.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document.
    async fn get(&self, collection: &str, id: &DocumentId) -> StorageResult<Option<Document>>;

    /// Every document matching `filter`, ordered by id.
    async fn query(&self, collection: &str, filter: &Filter) -> StorageResult<Vec<Document>>;

    /// Store a new document. With a `key`, the document is written at that id,
    /// replacing anything already there; without one, an id is generated.
    async fn create(
        &self,
        collection: &str,
        key: Option<DocumentId>,
        body: Value,
    ) -> StorageResult<DocumentId>;

    /// Shallow-merge the fields of `partial` into an existing document.
    async fn update(&self, collection: &str, id: &DocumentId, partial: Value) -> StorageResult<()>;

    /// Remove a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &DocumentId) -> StorageResult<bool>;
}

/// Read-only member listing.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn list_members(&self) -> StorageResult<Vec<Member>>;
}

/// Source of the current date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
