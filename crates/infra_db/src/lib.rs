//! Infrastructure Database Layer
//!
//! SQLite persistence for policies, using SQLx with runtime-checked queries.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories`] own the SQL
//! and row mapping, [`adapters`] implement domain ports on top of them and
//! translate errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, SqlitePolicyRepository};
//!
//! let store = SqlitePolicyRepository::connect(DatabaseConfig::new("sqlite://data/policies.db")).await?;
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, DatabaseConfig, DEFAULT_DATABASE_URL};
pub use error::DatabaseError;
pub use repositories::PolicyRepository;
pub use adapters::SqlitePolicyRepository;
