//! Property-Based Test Generators
//!
//! proptest strategies for claims and policies. Generated policies are
//! always valid; generated claims cover the whole input space the checker
//! has to tolerate, including absent fields and low-confidence provenance.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::{
    AssetType, ClaimantInfo, EvidenceChecklist, ImpactSeverity, IncidentDate, IncidentType,
    OperationalLiabilityClaim, Provenance, SourceModality,
};
use domain_policy::Policy;

/// Any incident type, including `unknown`
pub fn arb_incident_type() -> impl Strategy<Value = IncidentType> {
    prop::sample::select(IncidentType::ALL.to_vec())
}

/// One of the seven classifiable incident types
pub fn arb_known_incident_type() -> impl Strategy<Value = IncidentType> {
    prop::sample::select(IncidentType::KNOWN.to_vec())
}

pub fn arb_asset_type() -> impl Strategy<Value = AssetType> {
    prop::sample::select(AssetType::ALL.to_vec())
}

pub fn arb_severity() -> impl Strategy<Value = ImpactSeverity> {
    prop::sample::select(ImpactSeverity::ALL.to_vec())
}

/// Non-negative amounts up to ten million with up to two decimal places
pub fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64, 0u32..=2u32).prop_map(|(m, s)| Decimal::new(m, s))
}

pub fn arb_confidence() -> impl Strategy<Value = f64> {
    0.0f64..=1.0f64
}

pub fn arb_provenance() -> impl Strategy<Value = Provenance> {
    (prop::sample::select(SourceModality::ALL.to_vec()), arb_confidence())
        .prop_map(|(modality, confidence)| Provenance::new(modality, confidence))
}

/// Short free text, sometimes blank
pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("   ".to_string()), "[a-zA-Z0-9 ,.-]{1,60}"]
}

/// Dates spread from well before the two-year window to a week ahead of 2026-09-01
pub fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (-1200i64..7i64).prop_map(|days| Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap() + Duration::days(days))
}

pub fn arb_incident_date() -> impl Strategy<Value = IncidentDate> {
    prop_oneof![
        4 => arb_timestamp().prop_map(IncidentDate::Timestamp),
        1 => "[a-z ]{0,20}".prop_map(IncidentDate::Unparsed),
    ]
}

pub fn arb_evidence() -> impl Strategy<Value = EvidenceChecklist> {
    (any::<bool>(), 0u32..5u32, any::<bool>(), any::<bool>()).prop_map(
        |(has_system_logs, count, has_incident_report, has_liability_assessment)| EvidenceChecklist {
            has_system_logs,
            system_log_count: if has_system_logs { count } else { 0 },
            has_incident_report,
            has_liability_assessment,
        },
    )
}

/// Claims with every field independently present, absent or low-confidence
pub fn arb_claim() -> impl Strategy<Value = OperationalLiabilityClaim> {
    let incident = (
        arb_incident_type(),
        prop::option::of(arb_provenance()),
        arb_text(),
        prop::option::of(arb_provenance()),
        prop::option::of(arb_text()),
        prop::option::of(arb_provenance()),
        prop::option::of(arb_incident_date()),
    );
    let impact = (
        arb_asset_type(),
        prop::option::of(arb_provenance()),
        arb_severity(),
        prop::option::of(arb_amount()),
        prop::option::of(arb_text()),
    );

    (incident, impact, arb_evidence()).prop_map(|(incident, impact, evidence)| {
        let (incident_type, type_prov, description, description_prov, location, location_prov, date) = incident;
        let (asset_type, asset_prov, severity, cost, component) = impact;

        let mut claim = OperationalLiabilityClaim::new(ClaimantInfo::new("Acme Logistics Corp", "POL-TT-987654"));
        claim.incident.incident_type = incident_type;
        claim.incident.incident_type_provenance = type_prov;
        claim.incident.incident_description = description;
        claim.incident.incident_description_provenance = description_prov;
        claim.incident.incident_location = location;
        claim.incident.incident_location_provenance = location_prov;
        claim.incident.incident_date = date;
        claim.operational_impact.asset_type = asset_type;
        claim.operational_impact.asset_type_provenance = asset_prov;
        claim.operational_impact.impact_severity = severity;
        claim.operational_impact.estimated_liability_cost = cost;
        claim.operational_impact.system_component = component;
        claim.evidence = evidence;
        claim
    })
}

/// Valid policies over any subset of the known incident types
pub fn arb_policy() -> impl Strategy<Value = Policy> {
    (
        prop::collection::btree_set(arb_known_incident_type(), 0..=7),
        arb_amount(),
        arb_amount(),
        arb_amount(),
    )
        .prop_map(|(covered, limit, deductible, auto_max)| {
            let mut policy = Policy::new("POL-PROP-1", "Acme Logistics Corp");
            policy.covered_incident_types = covered;
            policy.limit_amount = limit;
            policy.deductible = deductible;
            policy.resolution_rules.auto_resolve_max_amount = auto_max;
            policy
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_generated_policies_validate(policy in arb_policy()) {
            prop_assert!(policy.validate().is_ok());
        }

        #[test]
        fn prop_log_count_implies_logs(claim in arb_claim()) {
            prop_assert!(claim.evidence.system_log_count == 0 || claim.evidence.has_system_logs);
        }
    }
}
