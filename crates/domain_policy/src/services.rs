//! Coverage domain service
//!
//! [`CoverageService`] is the entry point the outer layers use. It owns the
//! policy store handle and, optionally, a model-backed checker, and exposes
//! the rule-based engine on top of them.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info};

use core_kernel::{HealthCheckResult, PortError};
use domain_claims::{OperationalLiabilityClaim, ResolutionDecision};

use crate::coverage::{self, CoverageResult, PolicyVerification};
use crate::error::PolicyError;
use crate::llm_coverage::LlmCoverageChecker;
use crate::policy::Policy;
use crate::ports::{lookup_policy, PolicyPort};

/// Default page size for policy listings
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Service for coverage and resolution decisions
///
/// The store is injected; there is no process-wide policy registry.
#[derive(Clone)]
pub struct CoverageService {
    store: Arc<dyn PolicyPort>,
    llm: Option<LlmCoverageChecker>,
}

impl CoverageService {
    /// Creates a service over the given policy store
    pub fn new(store: Arc<dyn PolicyPort>) -> Self {
        Self { store, llm: None }
    }

    /// Enables the model-backed coverage path
    pub fn with_llm(mut self, checker: LlmCoverageChecker) -> Self {
        self.llm = Some(checker);
        self
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Looks a policy up by number
    ///
    /// # Arguments
    ///
    /// * `policy_number` - The number as the claimant gave it, e.g. `"POL-TT-987654"`
    ///
    /// # Returns
    ///
    /// The policy, or `None` when neither the exact number nor its digits match
    ///
    /// # Errors
    ///
    /// Returns error only if the store itself fails
    pub async fn get_policy(&self, policy_number: &str) -> Result<Option<Policy>, PolicyError> {
        Ok(lookup_policy(self.store.as_ref(), policy_number).await?)
    }

    /// Lists stored policies, up to `limit`
    pub async fn list_policies(&self, limit: usize) -> Result<Vec<Policy>, PolicyError> {
        Ok(self.store.list_all(limit).await?)
    }

    /// Validates and stores a policy, replacing any record with the same number
    ///
    /// # Errors
    ///
    /// Returns error if the policy fails validation or the store rejects it
    pub async fn save_policy(&self, policy: &Policy) -> Result<(), PolicyError> {
        policy.validate()?;
        self.store.save(policy).await?;
        info!(policy_number = %policy.policy_number, "Policy saved");
        Ok(())
    }

    /// Looks the policy up and checks the claimant against its named insured
    pub async fn verify_policy(
        &self,
        policy_number: &str,
        claimant_name: &str,
    ) -> Result<(Option<Policy>, PolicyVerification), PolicyError> {
        let policy = self.get_policy(policy_number).await?;
        let verification = PolicyVerification::from_lookup(policy_number, policy.as_ref(), claimant_name);
        debug!(policy_number, verified = verification.is_verified(), "Policy verification");
        Ok((policy, verification))
    }

    pub fn verify_claimant_name(&self, policy: &Policy, claimant_name: &str) -> bool {
        coverage::verify_claimant_name(policy, claimant_name)
    }

    pub fn compute_payout(&self, claim: &OperationalLiabilityClaim, policy: &Policy) -> Option<Decimal> {
        coverage::compute_payout(claim, policy)
    }

    pub fn get_required_extra_info(&self, claim: &OperationalLiabilityClaim, policy: &Policy) -> Vec<String> {
        coverage::get_required_extra_info(claim, policy)
    }

    /// Rule-based coverage decision
    pub fn check_coverage(&self, claim: &OperationalLiabilityClaim, policy: &Policy) -> CoverageResult {
        coverage::check_coverage(claim, policy)
    }

    /// Model-backed coverage decision
    ///
    /// Falls back to a not-covered result naming the problem when no model is
    /// configured, the call fails, or it exceeds `timeout` (the checker's own
    /// default when `None`).
    pub async fn check_coverage_llm(
        &self,
        claim: &OperationalLiabilityClaim,
        policy: &Policy,
        timeout: Option<Duration>,
    ) -> CoverageResult {
        match &self.llm {
            Some(checker) => {
                let timeout = timeout.unwrap_or_else(|| checker.timeout());
                checker.check_with_timeout(claim, policy, timeout).await
            }
            None => CoverageResult::failure("Coverage check failed: no language model is configured"),
        }
    }

    pub fn can_auto_resolve(
        &self,
        claim: &OperationalLiabilityClaim,
        policy: &Policy,
        name_verified: bool,
        fraud_flagged: bool,
    ) -> bool {
        coverage::can_auto_resolve(claim, policy, name_verified, fraud_flagged)
    }

    /// Resolution decision, logged at info
    pub fn decide(
        &self,
        claim: &OperationalLiabilityClaim,
        policy: &Policy,
        name_verified: bool,
        fraud_flagged: bool,
    ) -> ResolutionDecision {
        let decision = coverage::decide(claim, policy, name_verified, fraud_flagged);
        info!(
            claim_id = %claim.claim_id,
            policy_number = %policy.policy_number,
            auto_resolve = decision.is_auto_resolve(),
            "Resolution decided"
        );
        decision
    }

    /// Health of the underlying store
    pub async fn health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    /// Verifies the store answers queries
    pub async fn ping(&self) -> Result<(), PortError> {
        self.store.list_all(1).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::InMemoryPolicyStore;
    use domain_claims::{ClaimantInfo, IncidentType};

    fn service() -> CoverageService {
        let mut policy = Policy::new("987654", "Acme Logistics");
        policy.covered_incident_types.insert(IncidentType::Delay);
        CoverageService::new(Arc::new(InMemoryPolicyStore::with_policies([policy])))
    }

    #[tokio::test]
    async fn test_get_policy_with_digit_fallback() {
        let service = service();
        assert!(service.get_policy("POL-TT-987654").await.unwrap().is_some());
        assert!(service.get_policy("POL-TT-000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_verify_policy() {
        let service = service();
        let (policy, verification) = service.verify_policy("POL-TT-987654", "acme logistics").await.unwrap();
        assert!(policy.is_some());
        assert!(verification.is_verified());

        let (_, verification) = service.verify_policy("POL-TT-987654", "Globex").await.unwrap();
        assert!(matches!(verification, PolicyVerification::NameMismatch { .. }));
    }

    #[tokio::test]
    async fn test_llm_path_without_model_falls_back() {
        let service = service();
        let policy = service.get_policy("987654").await.unwrap().unwrap();
        let claim = OperationalLiabilityClaim::new(ClaimantInfo::new("Acme Logistics", "POL-TT-987654"));
        let result = service.check_coverage_llm(&claim, &policy, None).await;
        assert!(!result.is_covered);
        assert!(result.reason.starts_with("Coverage check failed"));
        assert!(result.suggested_payout_cap.is_none());
    }

    #[tokio::test]
    async fn test_save_policy_validates() {
        let service = service();
        let mut bad = Policy::new("POL-BAD", "Bad Co");
        bad.deductible = Decimal::NEGATIVE_ONE;
        assert!(service.save_policy(&bad).await.is_err());
        assert!(service.get_policy("POL-BAD").await.unwrap().is_none());
    }
}
