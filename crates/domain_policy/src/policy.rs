//! Operational liability policy
//!
//! Policies are loaded from documents (seed files, the database, or the API)
//! through [`PolicyDocument`], which is where every field is validated and
//! every rule condition parsed. A [`Policy`] value is therefore always
//! well-formed. Updates replace the whole record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use domain_claims::{EvidenceKey, IncidentType};

use crate::condition::RuleCondition;
use crate::error::PolicyError;

/// Default per-claim liability limit
pub const DEFAULT_LIMIT_AMOUNT: Decimal = dec!(50000);
/// Default ceiling for settling without human review
pub const DEFAULT_AUTO_RESOLVE_MAX_AMOUNT: Decimal = dec!(2000);

/// Evidence a policy asks for when its condition holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraInfoRule {
    pub condition: RuleCondition,
    pub required_evidence: EvidenceKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_hint: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl ExtraInfoRule {
    pub fn new(condition: RuleCondition, required_evidence: EvidenceKey) -> Self {
        Self {
            condition,
            required_evidence,
            question_hint: None,
            required: true,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.question_hint = Some(hint.into());
        self
    }

    /// Prompt to show when this rule is outstanding
    pub fn prompt(&self) -> String {
        match &self.question_hint {
            Some(hint) => hint.clone(),
            None => format!("Please provide {}.", self.required_evidence.label()),
        }
    }
}

/// When a claim may be settled without human review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRules {
    #[serde(default = "default_auto_resolve_max")]
    pub auto_resolve_max_amount: Decimal,
    #[serde(default = "default_true")]
    pub require_name_match: bool,
    #[serde(default = "default_true")]
    pub require_evidence_complete: bool,
    #[serde(default = "default_true")]
    pub require_incident_type_covered: bool,
}

impl Default for ResolutionRules {
    fn default() -> Self {
        Self {
            auto_resolve_max_amount: DEFAULT_AUTO_RESOLVE_MAX_AMOUNT,
            require_name_match: true,
            require_evidence_complete: true,
            require_incident_type_covered: true,
        }
    }
}

/// An AI-in-logistics operational liability policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyDocument", into = "PolicyDocument")]
pub struct Policy {
    /// Unique policy identifier
    pub policy_number: String,
    /// Company or contact name, used for claimant name verification
    pub named_insured: String,
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_to: Option<DateTime<Utc>>,
    /// Plain-language description, read by the model-backed coverage check
    pub coverage_description: Option<String>,
    pub covered_incident_types: BTreeSet<IncidentType>,
    /// Maximum payout per claim
    pub limit_amount: Decimal,
    /// Deducted from the claimed cost before capping
    pub deductible: Decimal,
    /// Additional per-type caps; never relax `limit_amount`
    pub per_incident_type_limits: Option<BTreeMap<IncidentType, Decimal>>,
    pub extra_info_rules: Vec<ExtraInfoRule>,
    pub resolution_rules: ResolutionRules,
}

impl Policy {
    /// Creates a policy with default limits and no coverage
    pub fn new(policy_number: impl Into<String>, named_insured: impl Into<String>) -> Self {
        Self {
            policy_number: policy_number.into(),
            named_insured: named_insured.into(),
            effective_from: None,
            effective_to: None,
            coverage_description: None,
            covered_incident_types: BTreeSet::new(),
            limit_amount: DEFAULT_LIMIT_AMOUNT,
            deductible: Decimal::ZERO,
            per_incident_type_limits: None,
            extra_info_rules: Vec::new(),
            resolution_rules: ResolutionRules::default(),
        }
    }

    pub fn covers(&self, incident_type: IncidentType) -> bool {
        self.covered_incident_types.contains(&incident_type)
    }

    /// Payout cap for an incident type: the policy limit, tightened by any per-type cap
    pub fn cap_for(&self, incident_type: IncidentType) -> Decimal {
        self.per_incident_type_limits
            .as_ref()
            .and_then(|limits| limits.get(&incident_type))
            .map(|per_type| (*per_type).min(self.limit_amount))
            .unwrap_or(self.limit_amount)
    }

    /// Checks the record invariants
    ///
    /// # Errors
    ///
    /// Returns an error if the policy number is blank or any amount is negative
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.policy_number.trim().is_empty() {
            return Err(PolicyError::validation("policy_number must not be empty"));
        }
        non_negative("limit_amount", self.limit_amount)?;
        non_negative("deductible", self.deductible)?;
        non_negative(
            "resolution_rules.auto_resolve_max_amount",
            self.resolution_rules.auto_resolve_max_amount,
        )?;
        if let Some(limits) = &self.per_incident_type_limits {
            for (incident_type, cap) in limits {
                non_negative(&format!("per_incident_type_limits.{}", incident_type), *cap)?;
            }
        }
        if let (Some(from), Some(to)) = (self.effective_from, self.effective_to) {
            if to < from {
                return Err(PolicyError::validation("effective_to is before effective_from"));
            }
        }
        Ok(())
    }

    /// Whether the policy is in effect at the given instant; open-ended bounds always pass
    pub fn is_effective_at(&self, at: DateTime<Utc>) -> bool {
        self.effective_from.map(|from| at >= from).unwrap_or(true)
            && self.effective_to.map(|to| at <= to).unwrap_or(true)
    }

    /// Covered types as their canonical names
    pub fn covered_type_names(&self) -> Vec<&'static str> {
        self.covered_incident_types.iter().map(|t| t.as_str()).collect()
    }
}

fn non_negative(field: &str, value: Decimal) -> Result<(), PolicyError> {
    if value < Decimal::ZERO {
        return Err(PolicyError::negative(field, value));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_limit() -> Decimal {
    DEFAULT_LIMIT_AMOUNT
}

fn default_auto_resolve_max() -> Decimal {
    DEFAULT_AUTO_RESOLVE_MAX_AMOUNT
}

/// Raw extra-info rule as it appears in a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraInfoRuleDocument {
    pub condition: String,
    pub required_evidence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_hint: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl TryFrom<ExtraInfoRuleDocument> for ExtraInfoRule {
    type Error = PolicyError;

    fn try_from(doc: ExtraInfoRuleDocument) -> Result<Self, Self::Error> {
        let condition = doc.condition.parse()?;
        let required_evidence = doc
            .required_evidence
            .parse()
            .map_err(|_| PolicyError::UnknownEvidenceKey(doc.required_evidence.clone()))?;
        Ok(Self {
            condition,
            required_evidence,
            question_hint: doc.question_hint.filter(|h| !h.trim().is_empty()),
            required: doc.required,
        })
    }
}

impl From<ExtraInfoRule> for ExtraInfoRuleDocument {
    fn from(rule: ExtraInfoRule) -> Self {
        Self {
            condition: rule.condition.to_string(),
            required_evidence: rule.required_evidence.as_str().to_string(),
            question_hint: rule.question_hint,
            required: rule.required,
        }
    }
}

/// Policy as it appears in seed files, storage, and API payloads
///
/// Incident types and evidence keys are plain strings here; converting into
/// a [`Policy`] parses and validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub named_insured: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_description: Option<String>,
    #[serde(default)]
    pub covered_incident_types: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit_amount: Decimal,
    #[serde(default)]
    pub deductible: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_incident_type_limits: Option<BTreeMap<String, Decimal>>,
    #[serde(default)]
    pub extra_info_rules: Vec<ExtraInfoRuleDocument>,
    #[serde(default)]
    pub resolution_rules: ResolutionRules,
}

fn parse_incident_type(raw: &str) -> Result<IncidentType, PolicyError> {
    raw.parse()
        .map_err(|_| PolicyError::validation(format!("unknown incident type '{}'", raw.trim())))
}

impl TryFrom<PolicyDocument> for Policy {
    type Error = PolicyError;

    fn try_from(doc: PolicyDocument) -> Result<Self, Self::Error> {
        let covered_incident_types = doc
            .covered_incident_types
            .iter()
            .map(|raw| parse_incident_type(raw))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let per_incident_type_limits = doc
            .per_incident_type_limits
            .map(|limits| {
                limits
                    .into_iter()
                    .map(|(raw, cap)| parse_incident_type(&raw).map(|t| (t, cap)))
                    .collect::<Result<BTreeMap<_, _>, _>>()
            })
            .transpose()?;

        let extra_info_rules = doc
            .extra_info_rules
            .into_iter()
            .map(ExtraInfoRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let policy = Policy {
            policy_number: doc.policy_number.trim().to_string(),
            named_insured: doc.named_insured,
            effective_from: doc.effective_from,
            effective_to: doc.effective_to,
            coverage_description: doc.coverage_description,
            covered_incident_types,
            limit_amount: doc.limit_amount,
            deductible: doc.deductible,
            per_incident_type_limits,
            extra_info_rules,
            resolution_rules: doc.resolution_rules,
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl From<Policy> for PolicyDocument {
    fn from(policy: Policy) -> Self {
        Self {
            policy_number: policy.policy_number,
            named_insured: policy.named_insured,
            effective_from: policy.effective_from,
            effective_to: policy.effective_to,
            coverage_description: policy.coverage_description,
            covered_incident_types: policy
                .covered_incident_types
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            limit_amount: policy.limit_amount,
            deductible: policy.deductible,
            per_incident_type_limits: policy.per_incident_type_limits.map(|limits| {
                limits
                    .into_iter()
                    .map(|(t, cap)| (t.as_str().to_string(), cap))
                    .collect()
            }),
            extra_info_rules: policy.extra_info_rules.into_iter().map(Into::into).collect(),
            resolution_rules: policy.resolution_rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_sparse_document() {
        let policy: Policy = serde_json::from_value(json!({
            "policy_number": "POL-TT-100200",
            "named_insured": "Northwind Freight",
            "covered_incident_types": ["delay", "Loss"]
        }))
        .unwrap();

        assert_eq!(policy.limit_amount, dec!(50000));
        assert_eq!(policy.deductible, Decimal::ZERO);
        assert_eq!(policy.resolution_rules, ResolutionRules::default());
        assert!(policy.covers(IncidentType::Loss));
        assert!(!policy.covers(IncidentType::Misroute));
    }

    #[test]
    fn test_document_number_may_be_omitted() {
        let doc: PolicyDocument = serde_json::from_value(json!({
            "named_insured": "Acme Logistics Corp",
            "covered_incident_types": ["delay"]
        }))
        .unwrap();
        assert!(doc.policy_number.is_empty());
        assert!(matches!(Policy::try_from(doc), Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let doc: PolicyDocument = serde_json::from_value(json!({
            "policy_number": "POL-1",
            "named_insured": "Acme",
            "deductible": -10
        }))
        .unwrap();
        let result = Policy::try_from(doc);
        assert!(matches!(result, Err(PolicyError::NegativeAmount { .. })));
    }

    #[test]
    fn test_bad_rule_is_a_load_error() {
        let doc: PolicyDocument = serde_json::from_value(json!({
            "policy_number": "POL-1",
            "named_insured": "Acme",
            "extra_info_rules": [
                {"condition": "incident_type ~ delay", "required_evidence": "system_logs"}
            ]
        }))
        .unwrap();
        assert!(matches!(Policy::try_from(doc), Err(PolicyError::InvalidCondition { .. })));

        let doc: PolicyDocument = serde_json::from_value(json!({
            "policy_number": "POL-1",
            "named_insured": "Acme",
            "extra_info_rules": [
                {"condition": "cost > 10", "required_evidence": "photos"}
            ]
        }))
        .unwrap();
        assert!(matches!(Policy::try_from(doc), Err(PolicyError::UnknownEvidenceKey(_))));
    }

    #[test]
    fn test_per_type_cap_never_relaxes_limit() {
        let mut policy = Policy::new("POL-1", "Acme");
        policy.limit_amount = dec!(10000);
        policy.per_incident_type_limits = Some(BTreeMap::from([
            (IncidentType::Delay, dec!(4000)),
            (IncidentType::Loss, dec!(90000)),
        ]));
        assert_eq!(policy.cap_for(IncidentType::Delay), dec!(4000));
        assert_eq!(policy.cap_for(IncidentType::Loss), dec!(10000));
        assert_eq!(policy.cap_for(IncidentType::Misroute), dec!(10000));
    }

    #[test]
    fn test_rule_prompt_falls_back_to_evidence_label() {
        let rule = ExtraInfoRule::new(RuleCondition::cost_above(dec!(5000)), EvidenceKey::LiabilityAssessment);
        assert_eq!(rule.prompt(), "Please provide liability assessment.");
        let hinted = rule.with_hint("Do you have the ops team's liability write-up?");
        assert_eq!(hinted.prompt(), "Do you have the ops team's liability write-up?");
    }

    #[test]
    fn test_document_round_trip_keeps_conditions() {
        let mut policy = Policy::new("POL-2", "Acme");
        policy.covered_incident_types.insert(IncidentType::PredictionFailure);
        policy.extra_info_rules.push(ExtraInfoRule::new(
            RuleCondition::IncidentTypeEquals(IncidentType::PredictionFailure),
            EvidenceKey::LiabilityAssessment,
        ));
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["extra_info_rules"][0]["condition"], "incident_type == prediction_failure");
        let back: Policy = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }
}
