//! Chapter Domain Types
//!
//! This crate defines the closed vocabularies and data model used by the
//! chapter access-control core:
//!
//! - **Role catalog**: every [`Role`] is either a membership [`CategoryRole`]
//!   or an office-holding [`PositionRole`]. The kind is the tag of the sum
//!   type, so classification cannot drift from the catalog.
//! - **Module / Action**: the functional areas a permission applies to and
//!   the CRUD verbs allowed on them.
//! - **Position catalog**: the eleven board offices in canonical order, each
//!   paired 1:1 with a cadre counterpart.
//! - **Assignments**: officer terms ([`PositionAssignment`]), the editable
//!   [`TermDraft`] and the [`TermAssignmentSet`] submitted for validation.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. Catalog enums
//! round-trip through their string codes via `Display`/`FromStr` and serde.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod assignment;
mod errors;
mod member;
mod position;
mod role;

pub use assignment::*;
pub use errors::*;
pub use member::*;
pub use position::*;
pub use role::*;
