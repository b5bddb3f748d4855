//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Standard claimant, policies and pinned clock
//! - `builders`: Claim and policy builders
//! - `database`: In-memory SQLite policy stores
//! - `assertions`: Assertion helpers for reports and decisions
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
