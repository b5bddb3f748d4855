//! Rule-based coverage and resolution decisions
//!
//! Everything here is a pure function of `(claim, policy)`. None of it can
//! fail: unknown incident types, absent or negative costs and blank names
//! all degrade to "not covered", "no payout" or "no match".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use domain_claims::{OperationalLiabilityClaim, ResolutionDecision, ReviewReason};

use crate::policy::Policy;

/// Outcome of a coverage check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub is_covered: bool,
    #[serde(default)]
    pub reason: String,
    /// Prompts for evidence the policy still requires
    #[serde(default)]
    pub required_evidence: Vec<String>,
    #[serde(default)]
    pub suggested_payout_cap: Option<Decimal>,
}

impl CoverageResult {
    /// Not covered, with the failure surfaced in `reason`
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            is_covered: false,
            reason: reason.into(),
            required_evidence: Vec::new(),
            suggested_payout_cap: None,
        }
    }
}

/// Lowercases, trims, and collapses internal whitespace
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the claimant name matches the policy's named insured
///
/// Names match when equal after normalisation or when either contains the
/// other, which tolerates legal suffixes ("Acme" vs "Acme Corp"). A blank
/// name on either side never matches.
pub fn verify_claimant_name(policy: &Policy, claimant_name: &str) -> bool {
    let insured = normalize_name(&policy.named_insured);
    let claimant = normalize_name(claimant_name);
    if insured.is_empty() || claimant.is_empty() {
        return false;
    }
    insured == claimant || insured.contains(&claimant) || claimant.contains(&insured)
}

/// Approved liability amount, or `None` when nothing is payable
///
/// The deductible comes off first, then the result is capped by the policy
/// limit and any per-incident-type cap.
pub fn compute_payout(claim: &OperationalLiabilityClaim, policy: &Policy) -> Option<Decimal> {
    let incident_type = claim.incident_type();
    if !policy.covers(incident_type) {
        return None;
    }
    let cost = claim.estimated_cost()?;
    if cost < Decimal::ZERO {
        return None;
    }
    let after_deductible = (cost - policy.deductible).max(Decimal::ZERO);
    Some(after_deductible.min(policy.cap_for(incident_type)))
}

/// Prompts for evidence the policy requires and the claim does not have yet
///
/// Rules are walked in policy order. A rule contributes when it is marked
/// required, its condition holds, and its evidence is still missing.
pub fn get_required_extra_info(claim: &OperationalLiabilityClaim, policy: &Policy) -> Vec<String> {
    policy
        .extra_info_rules
        .iter()
        .filter(|rule| rule.required)
        .filter(|rule| rule.condition.evaluate(claim))
        .filter(|rule| !claim.evidence.has(rule.required_evidence))
        .map(|rule| rule.prompt())
        .collect()
}

/// Rule-based coverage decision
pub fn check_coverage(claim: &OperationalLiabilityClaim, policy: &Policy) -> CoverageResult {
    let incident_type = claim.incident_type();
    if !policy.covers(incident_type) {
        return CoverageResult::failure(format!(
            "Incident type '{}' is not in policy's covered types: [{}].",
            incident_type,
            policy.covered_type_names().join(", ")
        ));
    }

    CoverageResult {
        is_covered: true,
        reason: "Incident type covered under policy; payout computed from limits and deductible.".to_string(),
        required_evidence: get_required_extra_info(claim, policy),
        suggested_payout_cap: compute_payout(claim, policy),
    }
}

/// Every gate that blocks auto-resolution
///
/// A fraud flag short-circuits: it is reported alone. Otherwise each enabled
/// resolution rule is checked independently and all failures are returned.
pub fn review_reasons(
    claim: &OperationalLiabilityClaim,
    policy: &Policy,
    name_verified: bool,
    fraud_flagged: bool,
) -> Vec<ReviewReason> {
    if fraud_flagged {
        return vec![ReviewReason::FraudFlagged];
    }

    let rules = &policy.resolution_rules;
    let mut reasons = Vec::new();

    if rules.require_name_match && !name_verified {
        reasons.push(ReviewReason::NameMismatch);
    }
    if rules.require_incident_type_covered && !policy.covers(claim.incident_type()) {
        reasons.push(ReviewReason::IncidentTypeNotCovered {
            incident_type: claim.incident_type(),
        });
    }
    let cost = claim.estimated_cost().unwrap_or(Decimal::ZERO);
    if cost > rules.auto_resolve_max_amount {
        reasons.push(ReviewReason::AmountAboveAutoResolveLimit {
            amount: cost,
            limit: rules.auto_resolve_max_amount,
        });
    }
    if rules.require_evidence_complete {
        let outstanding = get_required_extra_info(claim, policy);
        if !outstanding.is_empty() {
            reasons.push(ReviewReason::EvidenceOutstanding { items: outstanding });
        }
    }

    reasons
}

/// Whether the policy allows settling this claim without human review
pub fn can_auto_resolve(
    claim: &OperationalLiabilityClaim,
    policy: &Policy,
    name_verified: bool,
    fraud_flagged: bool,
) -> bool {
    review_reasons(claim, policy, name_verified, fraud_flagged).is_empty()
}

/// Auto-resolve gate together with the payout or the blocking reasons
pub fn decide(
    claim: &OperationalLiabilityClaim,
    policy: &Policy,
    name_verified: bool,
    fraud_flagged: bool,
) -> ResolutionDecision {
    let reasons = review_reasons(claim, policy, name_verified, fraud_flagged);
    debug!(
        claim_id = %claim.claim_id,
        policy_number = %policy.policy_number,
        blocked_by = reasons.len(),
        "Resolution gate evaluated"
    );
    if reasons.is_empty() {
        ResolutionDecision::AutoResolve {
            payout: compute_payout(claim, policy),
        }
    } else {
        ResolutionDecision::HumanReview { reasons }
    }
}

/// Result of matching a claimant against the policy store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PolicyVerification {
    NotFound { policy_number: String },
    NameMismatch { policy_number: String },
    Verified { policy_number: String },
}

impl PolicyVerification {
    /// Classifies a lookup result and name check
    pub fn from_lookup(requested: &str, policy: Option<&Policy>, claimant_name: &str) -> Self {
        match policy {
            None => PolicyVerification::NotFound {
                policy_number: requested.trim().to_string(),
            },
            Some(policy) if !verify_claimant_name(policy, claimant_name) => {
                PolicyVerification::NameMismatch {
                    policy_number: policy.policy_number.clone(),
                }
            }
            Some(policy) => PolicyVerification::Verified {
                policy_number: policy.policy_number.clone(),
            },
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, PolicyVerification::Verified { .. })
    }

    /// Message for the intake agent, or `None` when the claimant checks out
    pub fn issue_message(&self) -> Option<String> {
        match self {
            PolicyVerification::NotFound { policy_number } if policy_number.is_empty() => Some(
                "No policy number provided yet. Ask the caller for their policy number.".to_string(),
            ),
            PolicyVerification::NotFound { policy_number } => Some(format!(
                "Policy {} was not found. Ask the caller to double-check the policy number.",
                policy_number
            )),
            PolicyVerification::NameMismatch { policy_number } => Some(format!(
                "The caller's name does not match the named insured on policy {}. Confirm the full name before continuing.",
                policy_number
            )),
            PolicyVerification::Verified { .. } => None,
        }
    }
}

/// The "POLICY CHECK" line shown to the intake agent, if any
pub fn policy_issue_message(policy: Option<&Policy>, requested: &str, name_verified: bool) -> Option<String> {
    let verification = match policy {
        None => PolicyVerification::NotFound {
            policy_number: requested.trim().to_string(),
        },
        Some(p) if !name_verified => PolicyVerification::NameMismatch {
            policy_number: p.policy_number.clone(),
        },
        Some(p) => PolicyVerification::Verified {
            policy_number: p.policy_number.clone(),
        },
    };
    verification.issue_message()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::{ClaimantInfo, IncidentType};
    use rust_decimal_macros::dec;

    fn policy() -> Policy {
        let mut policy = Policy::new("POL-TT-987654", "Acme Corp");
        policy.covered_incident_types.insert(IncidentType::Delay);
        policy
    }

    fn claim(incident_type: IncidentType, cost: Option<Decimal>) -> OperationalLiabilityClaim {
        let mut claim = OperationalLiabilityClaim::new(ClaimantInfo::new("Acme Corp", "POL-TT-987654"));
        claim.incident.incident_type = incident_type;
        claim.operational_impact.estimated_liability_cost = cost;
        claim
    }

    #[test]
    fn test_name_normalisation() {
        assert_eq!(normalize_name("  Acme \t  Corp "), "acme corp");
        let policy = policy();
        assert!(verify_claimant_name(&policy, "acme corp"));
        assert!(verify_claimant_name(&policy, "Acme"));
        assert!(verify_claimant_name(&policy, "ACME CORP LLC"));
        assert!(!verify_claimant_name(&policy, ""));
        assert!(!verify_claimant_name(&policy, "Globex"));
    }

    #[test]
    fn test_blank_named_insured_never_matches() {
        let policy = Policy::new("POL-1", "  ");
        assert!(!verify_claimant_name(&policy, "Anyone"));
    }

    #[test]
    fn test_payout_none_cases() {
        let policy = policy();
        assert_eq!(compute_payout(&claim(IncidentType::Loss, Some(dec!(100))), &policy), None);
        assert_eq!(compute_payout(&claim(IncidentType::Delay, None), &policy), None);
        assert_eq!(compute_payout(&claim(IncidentType::Delay, Some(dec!(-1))), &policy), None);
    }

    #[test]
    fn test_deductible_larger_than_cost_pays_zero() {
        let mut policy = policy();
        policy.deductible = dec!(1000);
        assert_eq!(
            compute_payout(&claim(IncidentType::Delay, Some(dec!(400))), &policy),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_uncovered_reason_names_type_and_covered_set() {
        let result = check_coverage(&claim(IncidentType::Loss, Some(dec!(10))), &policy());
        assert!(!result.is_covered);
        assert_eq!(result.reason, "Incident type 'loss' is not in policy's covered types: [delay].");
        assert!(result.suggested_payout_cap.is_none());
    }

    #[test]
    fn test_fraud_is_reported_alone() {
        let reasons = review_reasons(&claim(IncidentType::Loss, Some(dec!(99999))), &policy(), false, true);
        assert_eq!(reasons, vec![ReviewReason::FraudFlagged]);
    }

    #[test]
    fn test_all_failing_gates_are_listed() {
        let reasons = review_reasons(&claim(IncidentType::Loss, Some(dec!(2500))), &policy(), false, false);
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0], ReviewReason::NameMismatch);
    }

    #[test]
    fn test_disabled_gates_are_skipped() {
        let mut policy = policy();
        policy.resolution_rules.require_name_match = false;
        policy.resolution_rules.require_incident_type_covered = false;
        assert!(can_auto_resolve(&claim(IncidentType::Loss, None), &policy, false, false));
    }

    #[test]
    fn test_policy_issue_messages() {
        let policy = policy();
        assert!(policy_issue_message(None, "POL-X", false).unwrap().contains("POL-X"));
        assert!(policy_issue_message(Some(&policy), "POL-TT-987654", false)
            .unwrap()
            .contains("does not match"));
        assert!(policy_issue_message(Some(&policy), "POL-TT-987654", true).is_none());

        let verification = PolicyVerification::from_lookup("987654", Some(&policy), "acme corp");
        assert!(verification.is_verified());
    }
}
