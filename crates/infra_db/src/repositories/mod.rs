//! Repository implementations
//!
//! Repositories own the SQL and map between rows and domain types. They
//! speak [`DatabaseError`](crate::DatabaseError); adapters translate that
//! into port errors.

pub mod policy;

pub use policy::{PolicyRepository, PolicyRow, POLICY_SCHEMA};
