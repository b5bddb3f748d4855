//! Domain Adapters
//!
//! Implementations of domain ports backed by the SQLite layer.
//!
//! ```rust,ignore
//! use infra_db::adapters::SqlitePolicyRepository;
//! use domain_policy::PolicyPort;
//!
//! let store: Arc<dyn PolicyPort> = Arc::new(SqlitePolicyRepository::connect(config).await?);
//! ```

pub mod policy;

pub use policy::SqlitePolicyRepository;
