//! Fixed vocabularies shared by extraction, the checker, and policies
//!
//! Values are serialized in `snake_case`. Parsing through [`FromStr`] is
//! forgiving about case, surrounding whitespace, and spaces or hyphens in
//! place of underscores, so `"Prediction Failure"` reads as
//! [`IncidentType::PredictionFailure`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClaimError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value of the vocabulary, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Canonical snake_case name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ClaimError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| ClaimError::UnknownVocabulary {
                        kind: $kind,
                        value: s.trim().to_string(),
                    })
            }
        }
    };
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

vocabulary! {
    /// Category of the operational failure behind a claim
    IncidentType, "incident type" {
        Misroute => "misroute",
        Delay => "delay",
        Loss => "loss",
        PredictionFailure => "prediction_failure",
        PricingError => "pricing_error",
        SystemOutage => "system_outage",
        DataError => "data_error",
        /// Extraction could not classify the incident
        Unknown => "unknown",
    }
}

vocabulary! {
    /// Kind of asset affected by the incident
    AssetType, "asset type" {
        Shipment => "shipment",
        Package => "package",
        Container => "container",
        AiModel => "ai_model",
        Sensor => "sensor",
        Route => "route",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// Claimed severity of the operational impact
    ImpactSeverity, "impact severity" {
        Minor => "minor",
        Moderate => "moderate",
        Severe => "severe",
        Critical => "critical",
        Unknown => "unknown",
    }
}

vocabulary! {
    /// Where an extracted value came from
    SourceModality, "source modality" {
        Text => "text",
        Image => "image",
        Document => "document",
        /// Supplied directly by the claimant during intake
        ClaimantInput => "claimant_input",
    }
}

vocabulary! {
    /// Evidence a policy can demand before a claim is resolved
    EvidenceKey, "evidence key" {
        SystemLogs => "system_logs",
        IncidentReport => "incident_report",
        LiabilityAssessment => "liability_assessment",
    }
}

impl IncidentType {
    /// The seven classifiable incident types (everything except `Unknown`)
    pub const KNOWN: [IncidentType; 7] = [
        IncidentType::Misroute,
        IncidentType::Delay,
        IncidentType::Loss,
        IncidentType::PredictionFailure,
        IncidentType::PricingError,
        IncidentType::SystemOutage,
        IncidentType::DataError,
    ];

    /// Parses a raw label, degrading to `Unknown` instead of failing
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(IncidentType::Unknown)
    }

    /// One-line definition used for policy display and model prompts
    pub fn definition(&self) -> Option<&'static str> {
        let text = match self {
            IncidentType::Misroute => "Shipment or delivery sent to the wrong destination, or routing decision by an AI/system caused incorrect destination or path.",
            IncidentType::Delay => "Delivery or operation delayed beyond agreed or reasonable time due to AI decision, system failure, or automated process error.",
            IncidentType::Loss => "Physical loss of goods, or loss of data/asset attributable to system or AI error (e.g. wrong handoff, incorrect disposal).",
            IncidentType::PredictionFailure => "AI or ML model prediction error that led to a wrong business decision (e.g. demand forecast, ETA, capacity).",
            IncidentType::PricingError => "Negotiated price for the load is lower than its cost (e.g. due to AI or system error in pricing or cost calculation).",
            IncidentType::SystemOutage => "Unplanned downtime or failure of an automated system or AI service that caused operational impact.",
            IncidentType::DataError => "Incorrect, corrupted, or missing data due to system or integration error (e.g. wrong label, bad sync) that caused loss or liability.",
            IncidentType::Unknown => return None,
        };
        Some(text)
    }

    /// Human-readable label, e.g. "prediction failure"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Default for IncidentType {
    fn default() -> Self {
        IncidentType::Unknown
    }
}

impl AssetType {
    /// Parses a raw label, degrading to `Unknown` instead of failing
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(AssetType::Unknown)
    }
}

impl Default for AssetType {
    fn default() -> Self {
        AssetType::Unknown
    }
}

impl ImpactSeverity {
    /// Parses a raw label, degrading to `Unknown` instead of failing
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(ImpactSeverity::Unknown)
    }
}

impl Default for ImpactSeverity {
    fn default() -> Self {
        ImpactSeverity::Unknown
    }
}

impl EvidenceKey {
    /// Human-readable label, e.g. "liability assessment"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// The incident-type glossary in presentation order
pub fn incident_type_definitions() -> impl Iterator<Item = (IncidentType, &'static str)> {
    IncidentType::KNOWN
        .iter()
        .filter_map(|t| t.definition().map(|d| (*t, d)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_forgiving() {
        assert_eq!("Prediction Failure".parse::<IncidentType>().unwrap(), IncidentType::PredictionFailure);
        assert_eq!(" system-outage ".parse::<IncidentType>().unwrap(), IncidentType::SystemOutage);
        assert_eq!("DELAY".parse::<IncidentType>().unwrap(), IncidentType::Delay);
        assert_eq!("ai model".parse::<AssetType>().unwrap(), AssetType::AiModel);
    }

    #[test]
    fn test_unrecognised_values() {
        assert!("flood".parse::<IncidentType>().is_err());
        assert_eq!(IncidentType::parse_lenient("flood"), IncidentType::Unknown);
        assert_eq!(ImpactSeverity::parse_lenient(""), ImpactSeverity::Unknown);
    }

    #[test]
    fn test_glossary_covers_the_seven_known_types() {
        let glossary: Vec<_> = incident_type_definitions().collect();
        assert_eq!(glossary.len(), 7);
        assert!(IncidentType::Unknown.definition().is_none());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&IncidentType::PricingError).unwrap();
        assert_eq!(json, "\"pricing_error\"");
        let key: EvidenceKey = serde_json::from_str("\"liability_assessment\"").unwrap();
        assert_eq!(key.label(), "liability assessment");
    }
}
