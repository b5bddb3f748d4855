//! Follow-up question selection

use serde::{Deserialize, Serialize};

use crate::claim::OperationalLiabilityClaim;
use crate::completeness::{Completeness, CompletenessItem};
use crate::thresholds::MAX_RECOMMENDED_QUESTIONS;
use crate::vocabulary::{ImpactSeverity, IncidentType};

/// Topic of a follow-up question, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUp {
    SystemLogs,
    IncidentDescription,
    IncidentType,
    AssetType,
    IncidentLocation,
    IncidentDate,
    EstimatedCost,
    ImpactSeverity,
}

impl FollowUp {
    pub const PRIORITY: [FollowUp; 8] = [
        FollowUp::SystemLogs,
        FollowUp::IncidentDescription,
        FollowUp::IncidentType,
        FollowUp::AssetType,
        FollowUp::IncidentLocation,
        FollowUp::IncidentDate,
        FollowUp::EstimatedCost,
        FollowUp::ImpactSeverity,
    ];

    pub fn question(&self) -> &'static str {
        match self {
            FollowUp::SystemLogs => "Can you provide system logs or telemetry data from the incident?",
            FollowUp::IncidentDescription => {
                "Can you describe what happened and how the operational failure occurred?"
            }
            FollowUp::IncidentType => "Can you clarify the type of incident? (misroute, delay, loss, data error, prediction failure, pricing error, system outage)",
            FollowUp::AssetType => "What type of asset was affected? (shipment, package, container, AI model, sensor, route, etc.)",
            FollowUp::IncidentLocation => {
                "Can you provide the system node, hub ID, or facility where the incident occurred?"
            }
            FollowUp::IncidentDate => "When did the incident occur?",
            FollowUp::EstimatedCost => "Do you have a liability estimate or expected cost range?",
            FollowUp::ImpactSeverity => {
                "How would you describe the impact severity? (minor, moderate, severe, or critical)"
            }
        }
    }

    fn applies(&self, claim: &OperationalLiabilityClaim, completeness: &Completeness) -> bool {
        match self {
            FollowUp::SystemLogs => completeness.is_missing(CompletenessItem::SystemLogs),
            FollowUp::IncidentDescription => completeness.is_missing(CompletenessItem::IncidentDescription),
            FollowUp::IncidentType => {
                claim.incident.incident_type == IncidentType::Unknown
                    || claim
                        .incident
                        .incident_type_provenance
                        .as_ref()
                        .map(|p| p.is_low_confidence())
                        .unwrap_or(false)
            }
            FollowUp::AssetType => completeness.is_missing(CompletenessItem::AssetType),
            FollowUp::IncidentLocation => completeness.is_missing(CompletenessItem::IncidentLocation),
            FollowUp::IncidentDate => completeness.is_missing(CompletenessItem::IncidentDate),
            FollowUp::EstimatedCost => completeness.is_missing(CompletenessItem::EstimatedLiabilityCost),
            FollowUp::ImpactSeverity => {
                claim.operational_impact.impact_severity == ImpactSeverity::Unknown
            }
        }
    }
}

/// Picks at most three follow-ups, highest priority first
pub fn recommend(claim: &OperationalLiabilityClaim, completeness: &Completeness) -> Vec<FollowUp> {
    FollowUp::PRIORITY
        .iter()
        .copied()
        .filter(|topic| topic.applies(claim, completeness))
        .take(MAX_RECOMMENDED_QUESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimantInfo, Provenance};
    use crate::completeness::score_tiers;
    use crate::vocabulary::SourceModality;

    #[test]
    fn test_empty_claim_gets_top_three() {
        let claim = OperationalLiabilityClaim::new(ClaimantInfo::default());
        let picked = recommend(&claim, &score_tiers(&claim));
        assert_eq!(
            picked,
            vec![FollowUp::SystemLogs, FollowUp::IncidentDescription, FollowUp::IncidentType]
        );
    }

    #[test]
    fn test_low_confidence_type_still_asks() {
        let mut claim = OperationalLiabilityClaim::new(ClaimantInfo::default());
        claim.evidence.has_system_logs = true;
        claim.evidence.system_log_count = 3;
        claim.incident.incident_description = "Router sent pallets to Reno".into();
        claim.incident.incident_type = IncidentType::Misroute;
        claim.incident.incident_type_provenance = Some(Provenance::new(SourceModality::Text, 0.1));

        let picked = recommend(&claim, &score_tiers(&claim));
        assert_eq!(picked[0], FollowUp::IncidentType);
    }

    #[test]
    fn test_severity_question_when_everything_else_is_known() {
        let mut claim = OperationalLiabilityClaim::new(ClaimantInfo::default());
        claim.evidence.has_system_logs = true;
        claim.evidence.system_log_count = 1;
        claim.incident.incident_description = "ETA model under-predicted by 3 days".into();
        claim.incident.incident_type = IncidentType::PredictionFailure;
        claim.operational_impact.asset_type = crate::vocabulary::AssetType::AiModel;
        claim.incident.incident_location = Some("DC-4".into());
        claim.incident.incident_date = Some(crate::claim::IncidentDate::Unparsed("2026-01-02".into()));
        claim.operational_impact.estimated_liability_cost = Some(rust_decimal::Decimal::ONE);

        let picked = recommend(&claim, &score_tiers(&claim));
        assert_eq!(picked, vec![FollowUp::ImpactSeverity]);
    }
}
