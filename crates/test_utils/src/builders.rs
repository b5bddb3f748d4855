//! Test Data Builders
//!
//! Builders let a test spell out only the fields it cares about. Each
//! setter touches exactly one field, so a test can start from a preset and
//! knock out or override single items.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::{
    AssetType, ClaimantInfo, EvidenceKey, ImpactSeverity, IncidentDate, IncidentType,
    OperationalLiabilityClaim, Provenance, SourceModality,
};
use domain_policy::{ExtraInfoRule, Policy, RuleCondition};

use crate::fixtures::ClaimantFixtures;

/// Builder for claim records
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    claim: OperationalLiabilityClaim,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// An empty claim from the standard claimant
    pub fn new() -> Self {
        Self {
            claim: OperationalLiabilityClaim::new(ClaimantFixtures::standard()),
        }
    }

    /// Every critical-tier item and nothing else
    ///
    /// One system log, a description, incident type `delay`, asset type
    /// `shipment`. Severity stays unknown.
    pub fn tier_one_only() -> Self {
        Self::new()
            .with_system_logs(1)
            .with_description("Routing model held 40 pallets at the Memphis hub for two extra days")
            .with_incident_type(IncidentType::Delay)
            .with_asset_type(AssetType::Shipment)
    }

    /// All ten completeness items satisfied, with no contradictions
    ///
    /// Moderate severity and a cost of 3000. The incident date is a few
    /// hours before the real clock; tests that pin the clock should set it.
    pub fn complete() -> Self {
        Self::tier_one_only()
            .with_system_logs(2)
            .with_type_confidence(0.92)
            .with_asset_confidence(0.88)
            .with_description_confidence(0.95)
            .with_severity(ImpactSeverity::Moderate)
            .with_location("Memphis hub, dock 4")
            .with_cost(dec!(3000))
            .with_date(Utc::now() - Duration::hours(6))
            .with_liability_assessment(true)
            .with_system_component("route-optimizer v2.3")
    }

    pub fn with_claimant(mut self, name: impl Into<String>, policy_number: impl Into<String>) -> Self {
        self.claim.claimant = ClaimantInfo::new(name, policy_number);
        self
    }

    pub fn with_incident_type(mut self, incident_type: IncidentType) -> Self {
        self.claim.incident.incident_type = incident_type;
        self
    }

    /// Extraction confidence on the incident type, from a text source
    pub fn with_type_confidence(mut self, confidence: f64) -> Self {
        self.claim.incident.incident_type_provenance = Some(Provenance::new(SourceModality::Text, confidence));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.claim.incident.incident_description = description.into();
        self
    }

    pub fn with_description_confidence(mut self, confidence: f64) -> Self {
        self.claim.incident.incident_description_provenance =
            Some(Provenance::new(SourceModality::Text, confidence));
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.claim.incident.incident_location = Some(location.into());
        self
    }

    pub fn with_location_confidence(mut self, confidence: f64) -> Self {
        self.claim.incident.incident_location_provenance =
            Some(Provenance::new(SourceModality::Image, confidence));
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.claim.incident.incident_date = Some(IncidentDate::Timestamp(date));
        self
    }

    /// A date as free text, the way extraction hands over what it could not normalise
    pub fn with_raw_date(mut self, raw: &str) -> Self {
        self.claim.incident.incident_date = Some(IncidentDate::Unparsed(raw.to_string()));
        self
    }

    pub fn without_date(mut self) -> Self {
        self.claim.incident.incident_date = None;
        self
    }

    pub fn with_asset_type(mut self, asset_type: AssetType) -> Self {
        self.claim.operational_impact.asset_type = asset_type;
        self
    }

    pub fn with_asset_confidence(mut self, confidence: f64) -> Self {
        self.claim.operational_impact.asset_type_provenance =
            Some(Provenance::new(SourceModality::Document, confidence));
        self
    }

    pub fn with_severity(mut self, severity: ImpactSeverity) -> Self {
        self.claim.operational_impact.impact_severity = severity;
        self
    }

    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.claim.operational_impact.estimated_liability_cost = Some(cost);
        self
    }

    pub fn without_cost(mut self) -> Self {
        self.claim.operational_impact.estimated_liability_cost = None;
        self
    }

    pub fn with_system_component(mut self, component: impl Into<String>) -> Self {
        self.claim.operational_impact.system_component = Some(component.into());
        self
    }

    /// Marks logs as uploaded with the given count
    pub fn with_system_logs(mut self, count: u32) -> Self {
        self.claim.evidence.has_system_logs = count > 0;
        self.claim.evidence.system_log_count = count;
        self
    }

    pub fn without_system_logs(self) -> Self {
        self.with_system_logs(0)
    }

    pub fn with_incident_report(mut self, present: bool) -> Self {
        self.claim.evidence.has_incident_report = present;
        self
    }

    pub fn with_liability_assessment(mut self, present: bool) -> Self {
        self.claim.evidence.has_liability_assessment = present;
        self
    }

    pub fn build(self) -> OperationalLiabilityClaim {
        self.claim
    }
}

/// Builder for policies
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    /// A policy with default limits that covers nothing yet
    pub fn new(policy_number: impl Into<String>, named_insured: impl Into<String>) -> Self {
        Self {
            policy: Policy::new(policy_number, named_insured),
        }
    }

    /// Covers `delay`, limit 10000, deductible 500, auto-resolve up to 5000, no rules
    pub fn delay_cover() -> Self {
        Self::new(crate::fixtures::STANDARD_POLICY_DIGITS, crate::fixtures::STANDARD_INSURED)
            .covering(IncidentType::Delay)
            .limit(dec!(10000))
            .deductible(dec!(500))
            .auto_resolve_max(dec!(5000))
    }

    pub fn covering(mut self, incident_type: IncidentType) -> Self {
        self.policy.covered_incident_types.insert(incident_type);
        self
    }

    pub fn limit(mut self, amount: Decimal) -> Self {
        self.policy.limit_amount = amount;
        self
    }

    pub fn deductible(mut self, amount: Decimal) -> Self {
        self.policy.deductible = amount;
        self
    }

    pub fn per_type_limit(mut self, incident_type: IncidentType, cap: Decimal) -> Self {
        self.policy
            .per_incident_type_limits
            .get_or_insert_with(Default::default)
            .insert(incident_type, cap);
        self
    }

    pub fn effective(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.policy.effective_from = Some(from);
        self.policy.effective_to = Some(to);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.policy.coverage_description = Some(text.into());
        self
    }

    pub fn rule(mut self, rule: ExtraInfoRule) -> Self {
        self.policy.extra_info_rules.push(rule);
        self
    }

    /// Adds a required rule from its text form, e.g. `"incident_type == loss"`
    ///
    /// # Panics
    ///
    /// Panics if the condition does not parse
    pub fn require_when(self, condition: &str, evidence: EvidenceKey) -> Self {
        let condition: RuleCondition = condition.parse().expect("test rule condition must parse");
        self.rule(ExtraInfoRule::new(condition, evidence))
    }

    pub fn auto_resolve_max(mut self, amount: Decimal) -> Self {
        self.policy.resolution_rules.auto_resolve_max_amount = amount;
        self
    }

    pub fn require_name_match(mut self, required: bool) -> Self {
        self.policy.resolution_rules.require_name_match = required;
        self
    }

    pub fn require_evidence_complete(mut self, required: bool) -> Self {
        self.policy.resolution_rules.require_evidence_complete = required;
        self
    }

    pub fn require_incident_type_covered(mut self, required: bool) -> Self {
        self.policy.resolution_rules.require_incident_type_covered = required;
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}
