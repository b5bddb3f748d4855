//! Database Test Utilities
//!
//! Every [`TestDatabase`] is a private in-memory SQLite database with the
//! policy schema applied, so tests never share state.

use domain_policy::{Policy, PolicyPort};
use infra_db::{DatabaseConfig, DatabaseError, DatabasePool, SqlitePolicyRepository};

/// An isolated, schema-initialised database
pub struct TestDatabase {
    pub store: SqlitePolicyRepository,
}

impl TestDatabase {
    /// Opens a fresh in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or the schema fails to apply
    pub async fn new() -> Result<Self, DatabaseError> {
        let store = SqlitePolicyRepository::connect(DatabaseConfig::in_memory()).await?;
        Ok(Self { store })
    }

    /// Opens a fresh database holding the given policies
    ///
    /// # Panics
    ///
    /// Panics if any policy fails to save
    pub async fn with_policies(policies: &[Policy]) -> Self {
        let db = Self::new().await.expect("Failed to create test database");
        for policy in policies {
            db.store.save(policy).await.expect("Failed to seed test policy");
        }
        db
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        self.store.repository().pool()
    }

    /// Deletes every policy while keeping the schema
    pub async fn clear_data(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM policies").execute(self.pool()).await?;
        Ok(())
    }
}
