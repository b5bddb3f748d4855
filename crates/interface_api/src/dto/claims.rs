//! Claim payloads

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use core_kernel::{ClaimId, Confidence};
use domain_claims::{
    AssetType, ClaimantInfo, ConsistencyFlags, EvidenceChecklist, ImpactSeverity, IncidentDate,
    IncidentInfo, IncidentType, OperationalImpactInfo, OperationalLiabilityClaim, Provenance,
    SourceModality,
};

use crate::error::ApiError;

/// Claim as posted by the extraction pipeline
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClaimRequest {
    /// Upstream id; a fresh one is minted when absent or malformed
    #[serde(default)]
    pub claim_id: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub claimant: ClaimantRequest,
    #[serde(default)]
    #[validate(nested)]
    pub incident: IncidentRequest,
    #[serde(default)]
    #[validate(nested)]
    pub operational_impact: ImpactRequest,
    #[serde(default)]
    pub evidence: EvidenceChecklist,
    #[serde(default)]
    pub consistency: ConsistencyFlags,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClaimantRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub policy_number: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub contact_email: Option<String>,
}

/// Source and confidence of one extracted value
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProvenanceRequest {
    pub source_modality: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    #[serde(default)]
    pub raw_snippet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IncidentRequest {
    #[serde(default)]
    pub incident_type: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub incident_type_provenance: Option<ProvenanceRequest>,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub incident_description: String,
    #[serde(default)]
    #[validate(nested)]
    pub incident_description_provenance: Option<ProvenanceRequest>,
    #[serde(default)]
    pub incident_location: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub incident_location_provenance: Option<ProvenanceRequest>,
    #[serde(default)]
    pub incident_date: Option<IncidentDate>,
    #[serde(default)]
    #[validate(nested)]
    pub incident_date_provenance: Option<ProvenanceRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ImpactRequest {
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub asset_type_provenance: Option<ProvenanceRequest>,
    #[serde(default)]
    pub impact_severity: Option<String>,
    #[serde(default)]
    pub estimated_liability_cost: Option<Decimal>,
    #[serde(default)]
    pub system_component: Option<String>,
}

impl ProvenanceRequest {
    fn into_provenance(self) -> Result<Provenance, ApiError> {
        let source_modality: SourceModality = self.source_modality.parse()?;
        let confidence = Confidence::try_new(self.confidence)?;
        let provenance = Provenance::new(source_modality, confidence);
        Ok(match self.raw_snippet {
            Some(snippet) => provenance.with_snippet(snippet),
            None => provenance,
        })
    }
}

fn provenance(raw: Option<ProvenanceRequest>) -> Result<Option<Provenance>, ApiError> {
    raw.map(ProvenanceRequest::into_provenance).transpose()
}

impl ClaimRequest {
    /// Validates the payload and builds the domain claim
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for out-of-range confidences, a
    /// malformed email, oversized text, or an unknown source modality
    pub fn into_claim(self) -> Result<OperationalLiabilityClaim, ApiError> {
        self.validate()?;

        let ClaimRequest {
            claim_id,
            claimant,
            incident,
            operational_impact,
            evidence,
            consistency,
        } = self;

        let incident = IncidentInfo {
            incident_type: incident
                .incident_type
                .as_deref()
                .map(IncidentType::parse_lenient)
                .unwrap_or_default(),
            incident_type_provenance: provenance(incident.incident_type_provenance)?,
            incident_description: incident.incident_description,
            incident_description_provenance: provenance(incident.incident_description_provenance)?,
            incident_location: incident.incident_location,
            incident_location_provenance: provenance(incident.incident_location_provenance)?,
            incident_date: incident.incident_date,
            incident_date_provenance: provenance(incident.incident_date_provenance)?,
        };

        let operational_impact = OperationalImpactInfo {
            asset_type: operational_impact
                .asset_type
                .as_deref()
                .map(AssetType::parse_lenient)
                .unwrap_or_default(),
            asset_type_provenance: provenance(operational_impact.asset_type_provenance)?,
            impact_severity: operational_impact
                .impact_severity
                .as_deref()
                .map(ImpactSeverity::parse_lenient)
                .unwrap_or_default(),
            estimated_liability_cost: operational_impact.estimated_liability_cost,
            system_component: operational_impact.system_component,
        };

        Ok(OperationalLiabilityClaim {
            claim_id: ClaimId::parse_or_new(claim_id.as_deref()),
            claimant: ClaimantInfo {
                name: claimant.name,
                policy_number: claimant.policy_number,
                contact_phone: claimant.contact_phone,
                contact_email: claimant.contact_email,
            },
            incident,
            operational_impact,
            evidence,
            consistency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> ClaimRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lenient_vocabulary() {
        let claim = request(json!({
            "claimant": {"name": "Acme Logistics Corp", "policy_number": "POL-TT-987654"},
            "incident": {"incident_type": "Prediction Failure"},
            "operational_impact": {"asset_type": "hovercraft", "impact_severity": "SEVERE", "estimated_liability_cost": 2500}
        }))
        .into_claim()
        .unwrap();

        assert_eq!(claim.incident.incident_type, IncidentType::PredictionFailure);
        assert_eq!(claim.operational_impact.asset_type, AssetType::Unknown);
        assert_eq!(claim.operational_impact.impact_severity, ImpactSeverity::Severe);
        assert_eq!(claim.estimated_cost(), Some(Decimal::new(2500, 0)));
    }

    #[test]
    fn test_confidence_out_of_range_is_rejected() {
        let result = request(json!({
            "incident": {
                "incident_type": "delay",
                "incident_type_provenance": {"source_modality": "text", "confidence": 1.7}
            }
        }))
        .into_claim();
        match result {
            Err(ApiError::Validation(_, details)) => {
                assert!(details.iter().any(|d| d.ends_with("confidence: range")), "{:?}", details);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unvalidated_provenance_still_rejects_bad_confidence() {
        let raw = ProvenanceRequest {
            source_modality: "text".to_string(),
            confidence: -0.1,
            raw_snippet: None,
        };
        match raw.into_provenance() {
            Err(ApiError::Validation(message, _)) => assert!(message.contains("got -0.1"), "{}", message),
            other => panic!("expected validation error, got {:?}", other),
        }

        let ok = ProvenanceRequest {
            source_modality: "text".to_string(),
            confidence: 0.3,
            raw_snippet: Some("around nine".to_string()),
        }
        .into_provenance()
        .unwrap();
        assert!(!ok.confidence.is_low());
    }

    #[test]
    fn test_unknown_modality_is_rejected() {
        let result = request(json!({
            "incident": {
                "incident_type_provenance": {"source_modality": "telepathy", "confidence": 0.5}
            }
        }))
        .into_claim();
        assert!(matches!(result, Err(ApiError::Validation(_, _))));
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let result = request(json!({
            "claimant": {"name": "Acme", "contact_email": "not-an-email"}
        }))
        .into_claim();
        assert!(matches!(result, Err(ApiError::Validation(_, _))));
    }

    #[test]
    fn test_claim_id_is_kept_or_minted() {
        let id = ClaimId::new_v7();
        let claim = request(json!({"claim_id": id.to_string()})).into_claim().unwrap();
        assert_eq!(claim.claim_id, id);

        let claim = request(json!({"claim_id": "nonsense"})).into_claim().unwrap();
        assert_ne!(claim.claim_id, id);
    }
}
