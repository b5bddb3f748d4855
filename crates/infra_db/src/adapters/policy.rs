//! SQLite Policy Adapter
//!
//! Bridges [`PolicyPort`] to the [`PolicyRepository`]. Database errors are
//! translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - Connection and pool failures -> `PortError::Connection` / `PortError::Timeout`
//! - Undecodable rows -> `PortError::Transformation`
//! - Other errors -> `PortError::Internal`

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_policy::{Policy, PolicyPort};

use crate::error::DatabaseError;
use crate::pool::{create_pool, DatabaseConfig, DatabasePool};
use crate::repositories::PolicyRepository;

const ADAPTER_ID: &str = "sqlite-policy-repository";

/// SQLite-backed policy store
#[derive(Debug, Clone)]
pub struct SqlitePolicyRepository {
    repository: PolicyRepository,
}

impl SqlitePolicyRepository {
    /// Wraps an existing pool; the schema is assumed to exist
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: PolicyRepository::new(pool),
        }
    }

    /// Opens the database and creates the schema if needed
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or the DDL fails
    pub async fn connect(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = create_pool(config).await?;
        let store = Self::new(pool);
        store.repository.ensure_schema().await?;
        Ok(store)
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &PolicyRepository {
        &self.repository
    }
}

impl DomainPort for SqlitePolicyRepository {}

#[async_trait]
impl HealthCheckable for SqlitePolicyRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM policies")
            .fetch_one(self.repository.pool())
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl PolicyPort for SqlitePolicyRepository {
    #[instrument(skip(self))]
    async fn get_by_policy_number(&self, policy_number: &str) -> Result<Option<Policy>, PortError> {
        let policy = self.repository.find_by_number(policy_number).await?;
        debug!(found = policy.is_some(), "Policy lookup");
        Ok(policy)
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<Policy>, PortError> {
        Ok(self.repository.list(limit).await?)
    }

    #[instrument(skip(self, policy), fields(policy_number = %policy.policy_number))]
    async fn save(&self, policy: &Policy) -> Result<(), PortError> {
        policy
            .validate()
            .map_err(|e| PortError::validation(e.to_string()))?;
        Ok(self.repository.upsert(policy).await?)
    }
}
