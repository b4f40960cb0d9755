//! Chapter Runtime
//!
//! Orchestration on top of the domain types, the permission policy and the
//! storage contracts:
//!
//! - [`AssignmentValidator`]: board, cadre and cross-role uniqueness plus
//!   date ordering, all violations reported together
//! - [`PositionAssignmentService`]: validated "replace all of year Y" term
//!   saves over a non-transactional document store, term lookup and
//!   per-assignment edits
//! - [`MatrixRepository`]: append-only permission matrix snapshots
//!
//! # Failure model
//!
//! A term save never starts writing until validation passes. Once writing
//! starts, the first failed store call stops the sequence and is reported
//! as a [`StoreFailure`] listing the calls that completed. Stored records
//! use deterministic keys, so repeating the save converges.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod assignment_service;
pub mod error;
pub mod matrix_repository;
pub mod validator;

pub use assignment_service::{
    PositionAssignmentService, RosterEntry, SaveOutcome, DEFAULT_ASSIGNMENT_COLLECTION,
};
pub use error::{RuntimeError, RuntimeResult, StoreFailure, StoreStep};
pub use matrix_repository::{LoadedMatrix, MatrixRepository, DEFAULT_MATRIX_COLLECTION};
pub use validator::{AssignmentValidator, ValidationReport, Violation};
