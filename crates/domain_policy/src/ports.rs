//! Policy store port and the in-process adapter
//!
//! ```text
//!   CoverageService ──► PolicyPort ◄── InMemoryPolicyStore
//!                                  ◄── infra_db::SqlitePolicyRepository
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::policy::Policy;

/// Keyed persistence for policies
///
/// A miss is `Ok(None)`, never an error and never a default policy.
#[async_trait]
pub trait PolicyPort: DomainPort + HealthCheckable {
    /// Exact lookup by policy number
    async fn get_by_policy_number(&self, policy_number: &str) -> Result<Option<Policy>, PortError>;

    /// Policies ordered by policy number, at most `limit`
    async fn list_all(&self, limit: usize) -> Result<Vec<Policy>, PortError>;

    /// Inserts or replaces the whole record
    async fn save(&self, policy: &Policy) -> Result<(), PortError>;
}

/// Strips every non-digit character ("POL-TT-987654" -> "987654")
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Looks a policy up by number, retrying with the digits alone on a miss
pub async fn lookup_policy(port: &dyn PolicyPort, policy_number: &str) -> Result<Option<Policy>, PortError> {
    let requested = policy_number.trim();
    if requested.is_empty() {
        return Ok(None);
    }
    if let Some(policy) = port.get_by_policy_number(requested).await? {
        return Ok(Some(policy));
    }

    let digits = digits_only(requested);
    if digits.is_empty() || digits == requested {
        return Ok(None);
    }
    debug!(requested, digits = %digits, "Retrying policy lookup with digits only");
    port.get_by_policy_number(&digits).await
}

/// Policies held in memory
///
/// Used by tests and when the service runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policies: RwLock<HashMap<String, Policy>>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with the given policies
    pub fn with_policies(policies: impl IntoIterator<Item = Policy>) -> Self {
        let map = policies
            .into_iter()
            .map(|p| (p.policy_number.clone(), p))
            .collect();
        Self {
            policies: RwLock::new(map),
        }
    }

    pub async fn len(&self) -> usize {
        self.policies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.policies.read().await.is_empty()
    }
}

impl DomainPort for InMemoryPolicyStore {}

#[async_trait]
impl HealthCheckable for InMemoryPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let _guard = self.policies.read().await;
        HealthCheckResult::healthy("policy_store.memory", started.elapsed().as_millis() as u64)
    }
}

#[async_trait]
impl PolicyPort for InMemoryPolicyStore {
    async fn get_by_policy_number(&self, policy_number: &str) -> Result<Option<Policy>, PortError> {
        Ok(self.policies.read().await.get(policy_number).cloned())
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<Policy>, PortError> {
        let guard = self.policies.read().await;
        let mut policies: Vec<Policy> = guard.values().cloned().collect();
        policies.sort_by(|a, b| a.policy_number.cmp(&b.policy_number));
        policies.truncate(limit);
        Ok(policies)
    }

    async fn save(&self, policy: &Policy) -> Result<(), PortError> {
        policy
            .validate()
            .map_err(|e| PortError::validation(e.to_string()))?;
        self.policies
            .write()
            .await
            .insert(policy.policy_number.clone(), policy.clone());
        Ok(())
    }
}
