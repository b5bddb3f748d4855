//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit and integration tests. The
//! standard claimant and policy line up with each other: the claimant's
//! name verifies against the policy's named insured.

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use once_cell::sync::Lazy;

use domain_claims::ClaimantInfo;
use domain_policy::{load_policies_from_json, Policy};

/// Policy number printed on the standard claimant's documents
pub const STANDARD_POLICY_NUMBER: &str = "POL-TT-987654";
/// Number the standard policy is stored under
pub const STANDARD_POLICY_DIGITS: &str = "987654";
/// Named insured on the standard policy
pub const STANDARD_INSURED: &str = "Acme Logistics Corp";

/// A seed document with two policies, one with conditional evidence rules
pub const SEED_POLICIES_JSON: &str = r#"[
  {
    "policy_number": "987654",
    "named_insured": "Acme Logistics Corp",
    "coverage_description": "Operational liability for AI routing, forecasting and pricing systems.",
    "covered_incident_types": ["delay", "misroute", "prediction_failure", "system_outage"],
    "limit_amount": 10000,
    "deductible": 500,
    "per_incident_type_limits": {"prediction_failure": 4000},
    "extra_info_rules": [
      {
        "condition": "incident_type == prediction_failure",
        "required_evidence": "liability_assessment",
        "question_hint": "Please provide the liability assessment for the forecasting model.",
        "required": true
      },
      {
        "condition": "estimated_liability_cost > 7500",
        "required_evidence": "incident_report",
        "required": true
      }
    ],
    "resolution_rules": {
      "auto_resolve_max_amount": 5000,
      "require_name_match": true,
      "require_evidence_complete": true,
      "require_incident_type_covered": true
    }
  },
  {
    "policy_number": "POL-GX-100200",
    "named_insured": "Globex Freight",
    "covered_incident_types": ["loss", "data_error"],
    "limit_amount": 25000,
    "deductible": 1000
  }
]"#;

static SEED_POLICIES: Lazy<Vec<Policy>> = Lazy::new(|| {
    load_policies_from_json(SEED_POLICIES_JSON).expect("seed fixture must parse")
});

/// Fixture for claimant test data
pub struct ClaimantFixtures;

impl ClaimantFixtures {
    /// The claimant matching the standard policy
    pub fn standard() -> ClaimantInfo {
        ClaimantInfo::new(STANDARD_INSURED, STANDARD_POLICY_NUMBER)
    }

    /// A claimant with a random company name and the given policy number
    pub fn random(policy_number: &str) -> ClaimantInfo {
        let name: String = CompanyName().fake();
        ClaimantInfo::new(name, policy_number)
    }

    /// A random company name
    pub fn company_name() -> String {
        CompanyName().fake()
    }
}

/// Fixture for policy test data
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Both policies from [`SEED_POLICIES_JSON`]
    pub fn seed() -> Vec<Policy> {
        SEED_POLICIES.clone()
    }

    /// The Acme policy: delay/misroute/prediction_failure/system_outage,
    /// limit 10000, deductible 500, auto-resolve up to 5000
    pub fn standard() -> Policy {
        SEED_POLICIES[0].clone()
    }

    /// The Globex policy: loss and data_error only
    pub fn globex() -> Policy {
        SEED_POLICIES[1].clone()
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference "now" for tests that pin the clock
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap()
    }

    /// A few days before [`TemporalFixtures::now`]
    pub fn recent_incident() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 28, 14, 30, 0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fixture_parses() {
        assert_eq!(PolicyFixtures::seed().len(), 2);
        assert_eq!(PolicyFixtures::standard().extra_info_rules.len(), 2);
    }

    #[test]
    fn test_random_claimant_has_a_name() {
        assert!(!ClaimantFixtures::random("X").name.is_empty());
    }
}
