//! Chapter storage abstractions.
//!
//! The access-control core reaches its collaborators only through the
//! traits defined here:
//! - [`DocumentStore`]: a plain document database (get/query/create/update/
//!   delete), without multi-document transactions
//! - [`MemberDirectory`]: read-only member listing used for display names
//! - [`Clock`]: today's date, used only to default the current term
//!
//! Two document store backends ship with the crate: a deterministic
//! in-memory store for tests and a JSON-file store for single-operator use.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod clock;
mod error;
pub mod file;
pub mod memory;
mod model;
mod traits;

pub use clock::{FixedClock, SystemClock};
pub use error::{StorageError, StorageResult};
pub use file::JsonFileDocumentStore;
pub use memory::{InMemoryDocumentStore, StaticMemberDirectory};
pub use model::{Document, DocumentId, Filter};
pub use traits::{Clock, DocumentStore, MemberDirectory};
