//! Contradiction detection
//!
//! Each check is independent; a claim may trigger any number of them. The
//! results come back in a fixed order: confidence, severity/cost bands,
//! description without logs, high cost without assessment, implausible
//! date, shaky location.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::claim::{OperationalLiabilityClaim, Provenance};
use crate::thresholds::{
    CRITICAL_MIN_COST, HIGH_COST_ASSESSMENT_THRESHOLD, LOW_CONFIDENCE_THRESHOLD,
    MAX_INCIDENT_AGE_DAYS, MINOR_MAX_COST, SEVERE_MIN_COST,
};
use crate::vocabulary::ImpactSeverity;

/// Field whose extraction confidence was too low to trust
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowConfidenceField {
    IncidentType,
    AssetType,
    IncidentDescription,
}

/// A detected inconsistency inside a single claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contradiction {
    LowConfidence { field: LowConfidenceField },
    SeverityCostMismatch { severity: ImpactSeverity, cost: Decimal },
    DescriptionWithoutLogs,
    HighCostWithoutAssessment { cost: Decimal },
    FutureIncidentDate { date: DateTime<Utc> },
    StaleIncidentDate { date: DateTime<Utc> },
    LowConfidenceLocation,
}

impl fmt::Display for Contradiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contradiction::LowConfidence { field } => {
                let what = match field {
                    LowConfidenceField::IncidentType => "incident type classification",
                    LowConfidenceField::AssetType => "asset type classification",
                    LowConfidenceField::IncidentDescription => "incident description extraction",
                };
                write!(f, "Low confidence on {} (confidence < {})", what, LOW_CONFIDENCE_THRESHOLD)
            }
            Contradiction::SeverityCostMismatch { severity, cost } => match severity {
                ImpactSeverity::Critical => write!(
                    f,
                    "Severity marked as CRITICAL but estimated cost is only ${:.2} (expected >${})",
                    cost, CRITICAL_MIN_COST
                ),
                ImpactSeverity::Severe => write!(
                    f,
                    "Severity marked as SEVERE but estimated cost is only ${:.2} (expected >${})",
                    cost, SEVERE_MIN_COST
                ),
                other => write!(
                    f,
                    "Severity marked as {} but estimated cost is ${:.2} (expected <${})",
                    other.as_str().to_uppercase(),
                    cost,
                    MINOR_MAX_COST
                ),
            },
            Contradiction::DescriptionWithoutLogs => {
                f.write_str("Incident description provided but no system logs uploaded")
            }
            Contradiction::HighCostWithoutAssessment { cost } => write!(
                f,
                "High estimated cost (${:.2}) but no liability assessment provided",
                cost
            ),
            Contradiction::FutureIncidentDate { date } => write!(
                f,
                "Incident date is in the future: {}",
                date.format("%Y-%m-%dT%H:%M:%S")
            ),
            Contradiction::StaleIncidentDate { date } => write!(
                f,
                "Incident date is more than 2 years old: {}",
                date.format("%Y-%m-%dT%H:%M:%S")
            ),
            Contradiction::LowConfidenceLocation => write!(
                f,
                "Incident location provided but with very low confidence (confidence < {})",
                LOW_CONFIDENCE_THRESHOLD
            ),
        }
    }
}

/// Runs every contradiction check against the claim as of `now`
pub fn detect_contradictions(claim: &OperationalLiabilityClaim, now: DateTime<Utc>) -> Vec<Contradiction> {
    let mut found = Vec::new();
    let incident = &claim.incident;
    let impact = &claim.operational_impact;

    let low = |p: &Option<Provenance>| p.as_ref().map(Provenance::is_low_confidence).unwrap_or(false);
    if low(&incident.incident_type_provenance) {
        found.push(Contradiction::LowConfidence { field: LowConfidenceField::IncidentType });
    }
    if low(&impact.asset_type_provenance) {
        found.push(Contradiction::LowConfidence { field: LowConfidenceField::AssetType });
    }
    if low(&incident.incident_description_provenance) {
        found.push(Contradiction::LowConfidence { field: LowConfidenceField::IncidentDescription });
    }

    let cost = claim.estimated_cost();
    if let Some(cost) = cost {
        let mismatch = match impact.impact_severity {
            ImpactSeverity::Critical => cost < CRITICAL_MIN_COST,
            ImpactSeverity::Severe => cost < SEVERE_MIN_COST,
            ImpactSeverity::Minor => cost > MINOR_MAX_COST,
            ImpactSeverity::Moderate | ImpactSeverity::Unknown => false,
        };
        if mismatch {
            found.push(Contradiction::SeverityCostMismatch {
                severity: impact.impact_severity,
                cost,
            });
        }
    }

    if incident.has_description() && !claim.evidence.has_system_logs {
        found.push(Contradiction::DescriptionWithoutLogs);
    }

    if let Some(cost) = cost {
        if cost > HIGH_COST_ASSESSMENT_THRESHOLD && !claim.evidence.has_liability_assessment {
            found.push(Contradiction::HighCostWithoutAssessment { cost });
        }
    }

    // an unreadable date only skips this check
    if let Some(date) = incident.incident_date.as_ref().and_then(|d| d.timestamp()) {
        if date > now {
            found.push(Contradiction::FutureIncidentDate { date });
        } else if date < now - Duration::days(MAX_INCIDENT_AGE_DAYS) {
            found.push(Contradiction::StaleIncidentDate { date });
        }
    }

    if incident.has_location() && low(&incident.incident_location_provenance) {
        found.push(Contradiction::LowConfidenceLocation);
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimantInfo, IncidentDate};
    use crate::vocabulary::SourceModality;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn claim() -> OperationalLiabilityClaim {
        let mut claim = OperationalLiabilityClaim::new(ClaimantInfo::new("Acme Corp", "POL-TT-1"));
        claim.evidence.has_system_logs = true;
        claim.evidence.system_log_count = 1;
        claim
    }

    #[test]
    fn test_clean_claim_has_no_contradictions() {
        assert!(detect_contradictions(&claim(), now()).is_empty());
    }

    #[test]
    fn test_confidence_at_threshold_is_not_low() {
        let mut claim = claim();
        claim.incident.incident_type_provenance = Some(Provenance::new(SourceModality::Text, 0.3));
        claim.operational_impact.asset_type_provenance = Some(Provenance::new(SourceModality::Image, 0.29));

        let found = detect_contradictions(&claim, now());
        assert_eq!(found, vec![Contradiction::LowConfidence { field: LowConfidenceField::AssetType }]);
    }

    #[test]
    fn test_severity_bands() {
        let mut claim = claim();
        claim.operational_impact.impact_severity = ImpactSeverity::Severe;
        claim.operational_impact.estimated_liability_cost = Some(dec!(999.99));
        assert_eq!(detect_contradictions(&claim, now()).len(), 1);

        claim.operational_impact.estimated_liability_cost = Some(dec!(1000));
        assert!(detect_contradictions(&claim, now()).is_empty());

        claim.operational_impact.impact_severity = ImpactSeverity::Minor;
        claim.operational_impact.estimated_liability_cost = Some(dec!(50001));
        claim.evidence.has_liability_assessment = true;
        let found = detect_contradictions(&claim, now());
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].to_string(),
            "Severity marked as MINOR but estimated cost is $50001.00 (expected <$50000)"
        );
    }

    #[test]
    fn test_blank_description_does_not_demand_logs() {
        let mut claim = claim();
        claim.evidence.has_system_logs = false;
        claim.evidence.system_log_count = 0;

        claim.incident.incident_description = "  \n\t ".into();
        assert!(detect_contradictions(&claim, now()).is_empty());

        claim.incident.incident_description = "Routing model sent trucks to a closed depot".into();
        assert_eq!(detect_contradictions(&claim, now()), vec![Contradiction::DescriptionWithoutLogs]);
    }

    #[test]
    fn test_high_cost_message_includes_amount() {
        let mut claim = claim();
        claim.operational_impact.estimated_liability_cost = Some(dec!(30000));
        let found = detect_contradictions(&claim, now());
        assert_eq!(
            found[0].to_string(),
            "High estimated cost ($30000.00) but no liability assessment provided"
        );
    }

    #[test]
    fn test_dates() {
        let mut claim = claim();
        claim.incident.incident_date = Some(IncidentDate::Timestamp(now() + Duration::days(1)));
        assert!(matches!(
            detect_contradictions(&claim, now()).as_slice(),
            [Contradiction::FutureIncidentDate { .. }]
        ));

        claim.incident.incident_date = Some(IncidentDate::Timestamp(now() - Duration::days(731)));
        assert!(matches!(
            detect_contradictions(&claim, now()).as_slice(),
            [Contradiction::StaleIncidentDate { .. }]
        ));

        claim.incident.incident_date = Some(IncidentDate::Unparsed("the week before last".into()));
        assert!(detect_contradictions(&claim, now()).is_empty());
    }

    #[test]
    fn test_low_confidence_location_needs_a_location() {
        let mut claim = claim();
        claim.incident.incident_location_provenance = Some(Provenance::new(SourceModality::Document, 0.1));
        assert!(detect_contradictions(&claim, now()).is_empty());

        claim.incident.incident_location = Some("Hub 12".into());
        assert_eq!(detect_contradictions(&claim, now()), vec![Contradiction::LowConfidenceLocation]);
    }
}
