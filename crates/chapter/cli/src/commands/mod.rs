//! CLI command implementations

pub mod catalog;
pub mod matrix;
pub mod term;
