//! Wiring from configuration to services

use crate::config::{ChapterConfig, StoreConfig};
use anyhow::Context as _;
use chapter_policy::{PermissionPolicy, RuleTable};
use chapter_runtime::{MatrixRepository, PositionAssignmentService};
use chapter_storage::{
    Clock, DocumentStore, InMemoryDocumentStore, JsonFileDocumentStore, MemberDirectory,
    StaticMemberDirectory, SystemClock,
};
use chapter_types::Member;
use std::sync::Arc;
use tracing::debug;

/// Shared handles for one CLI invocation
pub struct Context {
    pub config: ChapterConfig,
    pub policy: Arc<PermissionPolicy>,
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn MemberDirectory>,
    clock: Arc<dyn Clock>,
}

impl Context {
    pub async fn from_config(config: ChapterConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.store {
            StoreConfig::Memory => Arc::new(InMemoryDocumentStore::new()),
            StoreConfig::File { path } => Arc::new(
                JsonFileDocumentStore::open(path)
                    .await
                    .with_context(|| format!("opening store file {}", path))?,
            ),
        };

        let members = match &config.members.path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading members file {}", path))?;
                serde_json::from_str::<Vec<Member>>(&raw)
                    .with_context(|| format!("parsing members file {}", path))?
            }
            None => Vec::new(),
        };

        let rules = match &config.policy.rules_path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading rule table {}", path))?;
                RuleTable::from_json(&raw).with_context(|| format!("parsing rule table {}", path))?
            }
            None => RuleTable::standard(),
        };
        let policy = PermissionPolicy::new(rules)
            .with_super_roles(config.policy.super_roles.iter().copied());

        debug!(
            store = ?config.store,
            members = members.len(),
            super_roles = ?policy.super_roles(),
            "Context ready"
        );

        Ok(Self {
            policy: Arc::new(policy),
            store,
            directory: Arc::new(StaticMemberDirectory::new(members)),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    pub fn assignments(&self) -> PositionAssignmentService {
        PositionAssignmentService::new(
            self.store.clone(),
            self.directory.clone(),
            self.clock.clone(),
        )
        .with_collection(self.config.collections.assignments.clone())
    }

    pub fn matrices(&self) -> MatrixRepository {
        MatrixRepository::new(self.store.clone(), self.clock.clone())
            .with_collection(self.config.collections.matrices.clone())
    }
}
