//! Operational liability claim record
//!
//! The claim is assembled upstream by extraction and fusion. Nothing in this
//! crate corrects or re-derives it: the checker and the coverage engine only
//! read it and produce reports.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Confidence};

use crate::vocabulary::{AssetType, EvidenceKey, ImpactSeverity, IncidentType, SourceModality};

/// Where a field value came from and how sure extraction was about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_modality: SourceModality,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_snippet: Option<String>,
}

impl Provenance {
    pub fn new(source_modality: SourceModality, confidence: impl Into<Confidence>) -> Self {
        Self {
            source_modality,
            confidence: confidence.into(),
            raw_snippet: None,
        }
    }

    /// Provenance for a value the claimant typed in directly
    pub fn claimant_input() -> Self {
        Self::new(SourceModality::ClaimantInput, Confidence::CERTAIN)
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.raw_snippet = Some(snippet.into());
        self
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence.is_low()
    }
}

/// Who is claiming, and against which policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimantInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl ClaimantInfo {
    pub fn new(name: impl Into<String>, policy_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy_number: policy_number.into(),
            contact_phone: None,
            contact_email: None,
        }
    }
}

/// An incident date as extracted
///
/// Extraction may hand over free text it could not normalise. Such a value
/// still counts as "present" for completeness, but date checks skip it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncidentDate {
    Timestamp(DateTime<Utc>),
    Unparsed(String),
}

impl IncidentDate {
    /// The instant this date denotes, if it can be read as one
    ///
    /// Accepts RFC 3339, a naive ISO timestamp (taken as UTC), or a bare
    /// `YYYY-MM-DD` date (midnight UTC).
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            IncidentDate::Timestamp(ts) => Some(*ts),
            IncidentDate::Unparsed(raw) => parse_loose_timestamp(raw),
        }
    }
}

impl From<DateTime<Utc>> for IncidentDate {
    fn from(ts: DateTime<Utc>) -> Self {
        IncidentDate::Timestamp(ts)
    }
}

fn parse_loose_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// What happened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentInfo {
    #[serde(default)]
    pub incident_type: IncidentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_type_provenance: Option<Provenance>,

    #[serde(default)]
    pub incident_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_description_provenance: Option<Provenance>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_location_provenance: Option<Provenance>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<IncidentDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date_provenance: Option<Provenance>,
}

impl IncidentInfo {
    pub fn has_description(&self) -> bool {
        !self.incident_description.trim().is_empty()
    }

    pub fn has_location(&self) -> bool {
        is_filled(self.incident_location.as_deref())
    }
}

/// What was affected and how badly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalImpactInfo {
    #[serde(default)]
    pub asset_type: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type_provenance: Option<Provenance>,
    #[serde(default)]
    pub impact_severity: ImpactSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_liability_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_component: Option<String>,
}

impl OperationalImpactInfo {
    pub fn has_system_component(&self) -> bool {
        is_filled(self.system_component.as_deref())
    }
}

/// Supporting evidence received so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceChecklist {
    #[serde(default)]
    pub has_system_logs: bool,
    #[serde(default)]
    pub system_log_count: u32,
    #[serde(default)]
    pub has_incident_report: bool,
    #[serde(default)]
    pub has_liability_assessment: bool,
}

impl EvidenceChecklist {
    /// Whether the given evidence item has been supplied
    pub fn has(&self, key: EvidenceKey) -> bool {
        match key {
            EvidenceKey::SystemLogs => self.has_system_logs,
            EvidenceKey::IncidentReport => self.has_incident_report,
            EvidenceKey::LiabilityAssessment => self.has_liability_assessment,
        }
    }

    /// Evidence keys not yet supplied, in vocabulary order
    pub fn missing_evidence(&self) -> Vec<EvidenceKey> {
        EvidenceKey::ALL
            .iter()
            .copied()
            .filter(|key| !self.has(*key))
            .collect()
    }
}

/// Conflicts noticed while merging extraction outputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyFlags {
    #[serde(default)]
    pub has_conflicts: bool,
    #[serde(default)]
    pub conflict_details: Vec<String>,
}

/// A fused operational liability claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalLiabilityClaim {
    pub claim_id: ClaimId,
    #[serde(default)]
    pub claimant: ClaimantInfo,
    #[serde(default)]
    pub incident: IncidentInfo,
    #[serde(default)]
    pub operational_impact: OperationalImpactInfo,
    #[serde(default)]
    pub evidence: EvidenceChecklist,
    #[serde(default)]
    pub consistency: ConsistencyFlags,
}

impl OperationalLiabilityClaim {
    /// Creates an empty claim for the given claimant
    pub fn new(claimant: ClaimantInfo) -> Self {
        Self {
            claim_id: ClaimId::new_v7(),
            claimant,
            incident: IncidentInfo::default(),
            operational_impact: OperationalImpactInfo::default(),
            evidence: EvidenceChecklist::default(),
            consistency: ConsistencyFlags::default(),
        }
    }

    pub fn incident_type(&self) -> IncidentType {
        self.incident.incident_type
    }

    pub fn estimated_cost(&self) -> Option<Decimal> {
        self.operational_impact.estimated_liability_cost
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}
