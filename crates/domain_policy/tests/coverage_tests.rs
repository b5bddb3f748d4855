//! Tests for the coverage and resolution engine

use async_trait::async_trait;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use core_kernel::PortError;
use domain_claims::{check, EvidenceKey, IncidentType, ReviewReason};
use domain_policy::{
    can_auto_resolve, check_coverage, compute_payout, get_required_extra_info, verify_claimant_name,
    ChatModel, CoverageService, InMemoryPolicyStore, LlmCoverageChecker, Policy,
};

use test_utils::assertions::{assert_auto_resolved, assert_human_review, assert_payout_eq};
use test_utils::builders::{ClaimBuilder, PolicyBuilder};
use test_utils::fixtures::{PolicyFixtures, STANDARD_POLICY_NUMBER};
use test_utils::generators::{arb_amount, arb_claim, arb_known_incident_type, arb_policy};

// ============================================================================
// End-to-end Scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_delay_claim_settles_for_cost_minus_deductible() {
        let claim = ClaimBuilder::complete().build();
        let policy = PolicyBuilder::delay_cover().build();

        let report = check(&claim);
        assert_eq!(report.completeness_score, 1.0);
        assert!(report.contradictions.is_empty());

        assert_payout_eq(compute_payout(&claim, &policy), dec!(2500));
        assert!(verify_claimant_name(&policy, &claim.claimant.name));
        assert!(can_auto_resolve(&claim, &policy, true, false));

        let coverage = check_coverage(&claim, &policy);
        assert!(coverage.is_covered);
        assert!(coverage.required_evidence.is_empty());
        assert_payout_eq(coverage.suggested_payout_cap, dec!(2500));
    }

    #[test]
    fn test_delay_claim_without_optional_items_scores_point_nine() {
        let claim = ClaimBuilder::complete()
            .with_system_logs(1)
            .with_liability_assessment(false)
            .with_system_component("")
            .build();
        let report = check(&claim);

        assert_eq!(report.completeness_score, 0.9);
        assert!(report.contradictions.is_empty());
        assert!(can_auto_resolve(&claim, &PolicyBuilder::delay_cover().build(), true, false));
    }

    #[test]
    fn test_prediction_failure_rule_prompts_once() {
        let policy = PolicyBuilder::delay_cover()
            .covering(IncidentType::PredictionFailure)
            .require_when("incident_type == prediction_failure", EvidenceKey::LiabilityAssessment)
            .build();

        let forecast = ClaimBuilder::tier_one_only()
            .with_incident_type(IncidentType::PredictionFailure)
            .with_liability_assessment(false)
            .build();
        assert_eq!(
            get_required_extra_info(&forecast, &policy),
            vec!["Please provide liability assessment."]
        );

        let delay = ClaimBuilder::tier_one_only().with_liability_assessment(false).build();
        assert!(get_required_extra_info(&delay, &policy).is_empty());
    }

    #[test]
    fn test_seeded_policy_rules_stack() {
        let policy = PolicyFixtures::standard();
        let claim = ClaimBuilder::complete()
            .with_incident_type(IncidentType::PredictionFailure)
            .with_liability_assessment(false)
            .with_cost(dec!(9000))
            .build();

        let prompts = get_required_extra_info(&claim, &policy);
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], "Please provide the liability assessment for the forecasting model.");
        assert_eq!(prompts[1], "Please provide incident report.");

        // 9000 - 500 = 8500, then the 4000 prediction_failure cap applies
        assert_payout_eq(compute_payout(&claim, &policy), dec!(4000));
    }

    #[test]
    fn test_uncovered_type_names_covered_list() {
        let claim = ClaimBuilder::complete().with_incident_type(IncidentType::Loss).build();
        let coverage = check_coverage(&claim, &PolicyBuilder::delay_cover().build());

        assert!(!coverage.is_covered);
        assert_eq!(coverage.reason, "Incident type 'loss' is not in policy's covered types: [delay].");
        assert!(coverage.suggested_payout_cap.is_none());
    }
}

// ============================================================================
// Payout and Gate Properties
// ============================================================================

mod property_tests {
    use super::*;

    fn covered_claim(incident_type: IncidentType, cost: Decimal) -> domain_claims::OperationalLiabilityClaim {
        ClaimBuilder::complete()
            .with_incident_type(incident_type)
            .with_cost(cost)
            .build()
    }

    proptest! {
        #[test]
        fn prop_payout_non_increasing_in_deductible(
            policy in arb_policy(),
            incident_type in arb_known_incident_type(),
            cost in arb_amount(),
            d1 in arb_amount(),
            d2 in arb_amount(),
        ) {
            let (low, high) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let mut policy = policy;
            policy.covered_incident_types.insert(incident_type);
            let claim = covered_claim(incident_type, cost);

            let mut cheap = policy.clone();
            cheap.deductible = low;
            let mut dear = policy;
            dear.deductible = high;

            prop_assert!(compute_payout(&claim, &cheap) >= compute_payout(&claim, &dear));
        }

        #[test]
        fn prop_payout_non_decreasing_in_cost_and_capped(
            policy in arb_policy(),
            incident_type in arb_known_incident_type(),
            c1 in arb_amount(),
            c2 in arb_amount(),
        ) {
            let (low, high) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
            let mut policy = policy;
            policy.covered_incident_types.insert(incident_type);

            let small = compute_payout(&covered_claim(incident_type, low), &policy).unwrap();
            let large = compute_payout(&covered_claim(incident_type, high), &policy).unwrap();

            prop_assert!(small <= large);
            prop_assert!(large <= policy.cap_for(incident_type));
            prop_assert!(small >= Decimal::ZERO);
        }

        #[test]
        fn prop_uncovered_type_has_no_payout(claim in arb_claim(), policy in arb_policy()) {
            if !policy.covers(claim.incident_type()) {
                prop_assert!(compute_payout(&claim, &policy).is_none());
            }
        }

        #[test]
        fn prop_fraud_never_auto_resolves(claim in arb_claim(), policy in arb_policy(), name_ok in any::<bool>()) {
            prop_assert!(!can_auto_resolve(&claim, &policy, name_ok, true));
        }
    }

    #[test]
    fn test_per_type_cap_never_relaxes_limit() {
        let policy = PolicyBuilder::delay_cover()
            .per_type_limit(IncidentType::Delay, dec!(20000))
            .build();
        let claim = covered_claim(IncidentType::Delay, dec!(40000));
        assert_payout_eq(compute_payout(&claim, &policy), dec!(10000));
    }

    #[test]
    fn test_negative_cost_has_no_payout() {
        let claim = covered_claim(IncidentType::Delay, dec!(-10));
        assert!(compute_payout(&claim, &PolicyBuilder::delay_cover().build()).is_none());
    }

    #[test]
    fn test_deductible_above_cost_pays_zero() {
        let claim = covered_claim(IncidentType::Delay, dec!(300));
        assert_payout_eq(compute_payout(&claim, &PolicyBuilder::delay_cover().build()), Decimal::ZERO);
    }
}

// ============================================================================
// Name Verification
// ============================================================================

mod name_tests {
    use super::*;

    #[test]
    fn test_name_matching_cases() {
        let policy = Policy::new("1", "Acme Corp");
        assert!(verify_claimant_name(&policy, "acme corp"));
        assert!(verify_claimant_name(&policy, "  ACME   Corp "));
        assert!(verify_claimant_name(&policy, "Acme"));
        assert!(!verify_claimant_name(&policy, ""));
        assert!(!verify_claimant_name(&policy, "Globex"));
        assert!(!verify_claimant_name(&Policy::new("2", ""), "Acme"));
    }
}

// ============================================================================
// Coverage Service
// ============================================================================

mod service_tests {
    use super::*;

    fn service() -> CoverageService {
        CoverageService::new(Arc::new(InMemoryPolicyStore::with_policies(PolicyFixtures::seed())))
    }

    #[tokio::test]
    async fn test_decide_for_printed_policy_number() {
        let service = service();
        let claim = ClaimBuilder::complete().build();

        let policy = service.get_policy(STANDARD_POLICY_NUMBER).await.unwrap().unwrap();
        assert_eq!(policy.policy_number, "987654");

        let name_ok = service.verify_claimant_name(&policy, &claim.claimant.name);
        let decision = service.decide(&claim, &policy, name_ok, false);
        assert_payout_eq(assert_auto_resolved(&decision), dec!(2500));
    }

    #[tokio::test]
    async fn test_decide_collects_every_blocking_gate() {
        let service = service();
        let policy = service.get_policy("987654").await.unwrap().unwrap();
        let claim = ClaimBuilder::complete()
            .with_claimant("Someone Else Ltd", STANDARD_POLICY_NUMBER)
            .with_cost(dec!(8000))
            .build();

        let decision = service.decide(&claim, &policy, false, false);
        let reasons = assert_human_review(&decision);

        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0], ReviewReason::NameMismatch);
        assert_eq!(
            reasons[1],
            ReviewReason::AmountAboveAutoResolveLimit { amount: dec!(8000), limit: dec!(5000) }
        );
        assert!(matches!(&reasons[2], ReviewReason::EvidenceOutstanding { items } if items.len() == 1));
    }

    #[tokio::test]
    async fn test_fraud_is_reported_alone() {
        let service = service();
        let policy = service.get_policy("987654").await.unwrap().unwrap();
        let claim = ClaimBuilder::complete().with_cost(dec!(90000)).build();

        let decision = service.decide(&claim, &policy, false, true);
        assert_eq!(assert_human_review(&decision), &[ReviewReason::FraudFlagged]);
    }

    #[tokio::test]
    async fn test_missing_policy_is_none() {
        assert!(service().get_policy("POL-XX-000001").await.unwrap().is_none());
        assert!(service().get_policy("   ").await.unwrap().is_none());
    }
}

// ============================================================================
// Model-backed Coverage
// ============================================================================

mod llm_tests {
    use super::*;

    struct CannedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for CannedModel {
        async fn complete(&self, prompt: &str) -> Result<String, PortError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    struct SlowModel;

    #[async_trait]
    impl ChatModel for SlowModel {
        async fn complete(&self, _prompt: &str) -> Result<String, PortError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(r#"{"is_covered": true}"#.to_string())
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    struct RateLimitedModel;

    #[async_trait]
    impl ChatModel for RateLimitedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, PortError> {
            Err(PortError::RateLimited { retry_after_secs: 30 })
        }

        fn model_name(&self) -> &str {
            "limited"
        }
    }

    #[tokio::test]
    async fn test_fenced_verdict_is_parsed() {
        let model = Arc::new(CannedModel::new(
            "```json\n{\"is_covered\": true, \"reason\": \"Delay is listed\", \"required_evidence\": [\"system_logs\"], \"suggested_payout_cap\": 2500}\n```",
        ));
        let checker = LlmCoverageChecker::new(model.clone());
        let claim = ClaimBuilder::complete().build();
        let policy = PolicyFixtures::standard();

        let result = checker.check(&claim, &policy).await;
        assert!(result.is_covered);
        assert_eq!(result.reason, "Delay is listed");
        assert_eq!(result.required_evidence, vec!["system_logs"]);
        assert_payout_eq(result.suggested_payout_cap, dec!(2500));

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("prediction_failure:"));
        assert!(prompts[0].contains("\"policy_number\": \"987654\""));
        assert!(prompts[0].contains("Memphis hub, dock 4"));
    }

    #[tokio::test]
    async fn test_prose_reply_falls_back() {
        let checker = LlmCoverageChecker::new(Arc::new(CannedModel::new("Looks covered to me!")));
        let result = checker.check(&ClaimBuilder::complete().build(), &PolicyFixtures::standard()).await;

        assert!(!result.is_covered);
        assert!(result.reason.starts_with("Coverage check failed: "));
        assert!(result.required_evidence.is_empty());
        assert!(result.suggested_payout_cap.is_none());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let checker = LlmCoverageChecker::new(Arc::new(SlowModel)).with_timeout(Duration::from_millis(50));
        let result = tokio::time::timeout(
            Duration::from_secs(2),
            checker.check(&ClaimBuilder::complete().build(), &PolicyFixtures::standard()),
        )
        .await
        .expect("checker must honour its own timeout");

        assert!(!result.is_covered);
        assert!(result.reason.contains("Timeout"));
    }

    #[tokio::test]
    async fn test_transport_error_falls_back() {
        let service = CoverageService::new(Arc::new(InMemoryPolicyStore::new()))
            .with_llm(LlmCoverageChecker::new(Arc::new(RateLimitedModel)));
        let result = service
            .check_coverage_llm(&ClaimBuilder::complete().build(), &PolicyFixtures::standard(), None)
            .await;

        assert!(!result.is_covered);
        assert!(result.reason.contains("Rate limited"));
    }
}
