//! # Chapter Permission Policy
//!
//! Decides, for every (module, action, role) triple, whether the role may act.
//!
//! ## Overview
//!
//! - [`RuleTable`]: data-driven `Role -> Module -> {Action}` grants
//! - [`PermissionPolicy`]: table lookup plus an explicit super-role override;
//!   anything not granted is denied
//! - [`PermissionMatrix`]: the policy materialized into one editable cell per
//!   triple, with stats, reset and hashed snapshots for persistence
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chapter_policy::{PermissionMatrix, PermissionPolicy};
//! use chapter_types::{Action, Module, Role};
//!
//! let policy = Arc::new(PermissionPolicy::standard());
//! assert!(policy.evaluate(Module::FinanceManagement, Action::Update, Role::TREASURER));
//! assert!(!policy.evaluate(Module::FinanceManagement, Action::Update, Role::SECRETARY));
//!
//! let mut matrix = PermissionMatrix::build(policy);
//! matrix.toggle(Module::Messaging, Action::Create, Role::FULL_MEMBER, true);
//! assert_eq!(matrix.overrides().len(), 1);
//! matrix.reset();
//! assert!(matrix.overrides().is_empty());
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod matrix;
pub mod policy;
pub mod rules;

pub use error::{PolicyError, Result};
pub use matrix::{CellCount, MatrixCell, MatrixSnapshot, MatrixStats, PermissionMatrix, SnapshotCell};
pub use policy::{Grant, PermissionPolicy};
pub use rules::RuleTable;
