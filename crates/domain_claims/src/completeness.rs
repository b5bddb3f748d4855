//! Tiered completeness scoring
//!
//! Ten evidence items are grouped into three weighted tiers. A tier
//! contributes `satisfied / items * weight`; the total is the plain sum,
//! so it can never leave `[0, 1]`.
//!
//! | Tier | Weight | Items |
//! |------|--------|-------|
//! | Critical | 0.6 | system_logs, incident_description, incident_type, asset_type |
//! | Important | 0.3 | incident_location, estimated_liability_cost, incident_date |
//! | Supporting | 0.1 | liability_assessment, system_component, multiple_logs |

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::claim::OperationalLiabilityClaim;
use crate::thresholds::{TIER_1_WEIGHT, TIER_2_WEIGHT, TIER_3_WEIGHT};
use crate::vocabulary::{AssetType, IncidentType};

/// Evidence tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Critical,
    Important,
    Supporting,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Critical, Tier::Important, Tier::Supporting];

    pub fn weight(&self) -> Decimal {
        match self {
            Tier::Critical => TIER_1_WEIGHT,
            Tier::Important => TIER_2_WEIGHT,
            Tier::Supporting => TIER_3_WEIGHT,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = CompletenessItem> + '_ {
        CompletenessItem::ALL
            .iter()
            .copied()
            .filter(move |item| item.tier() == *self)
    }
}

/// A single scored evidence item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessItem {
    SystemLogs,
    IncidentDescription,
    IncidentType,
    AssetType,
    IncidentLocation,
    EstimatedLiabilityCost,
    IncidentDate,
    LiabilityAssessment,
    SystemComponent,
    MultipleLogs,
}

impl CompletenessItem {
    /// Every item in reporting order
    pub const ALL: [CompletenessItem; 10] = [
        CompletenessItem::SystemLogs,
        CompletenessItem::IncidentDescription,
        CompletenessItem::IncidentType,
        CompletenessItem::AssetType,
        CompletenessItem::IncidentLocation,
        CompletenessItem::EstimatedLiabilityCost,
        CompletenessItem::IncidentDate,
        CompletenessItem::LiabilityAssessment,
        CompletenessItem::SystemComponent,
        CompletenessItem::MultipleLogs,
    ];

    /// Canonical name reported in `missing_required_evidence`
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletenessItem::SystemLogs => "system_logs",
            CompletenessItem::IncidentDescription => "incident_description",
            CompletenessItem::IncidentType => "incident_type",
            CompletenessItem::AssetType => "asset_type",
            CompletenessItem::IncidentLocation => "incident_location",
            CompletenessItem::EstimatedLiabilityCost => "estimated_liability_cost",
            CompletenessItem::IncidentDate => "incident_date",
            CompletenessItem::LiabilityAssessment => "liability_assessment",
            CompletenessItem::SystemComponent => "system_component",
            CompletenessItem::MultipleLogs => "multiple_logs",
        }
    }

    pub fn tier(&self) -> Tier {
        use CompletenessItem::*;
        match self {
            SystemLogs | IncidentDescription | IncidentType | AssetType => Tier::Critical,
            IncidentLocation | EstimatedLiabilityCost | IncidentDate => Tier::Important,
            LiabilityAssessment | SystemComponent | MultipleLogs => Tier::Supporting,
        }
    }

    pub fn is_satisfied(&self, claim: &OperationalLiabilityClaim) -> bool {
        let evidence = &claim.evidence;
        match self {
            CompletenessItem::SystemLogs => evidence.has_system_logs && evidence.system_log_count >= 1,
            CompletenessItem::IncidentDescription => claim.incident.has_description(),
            CompletenessItem::IncidentType => claim.incident.incident_type != IncidentType::Unknown,
            CompletenessItem::AssetType => claim.operational_impact.asset_type != AssetType::Unknown,
            CompletenessItem::IncidentLocation => claim.incident.has_location(),
            // zero is a legitimate estimate
            CompletenessItem::EstimatedLiabilityCost => claim.estimated_cost().is_some(),
            CompletenessItem::IncidentDate => claim.incident.incident_date.is_some(),
            CompletenessItem::LiabilityAssessment => evidence.has_liability_assessment,
            CompletenessItem::SystemComponent => claim.operational_impact.has_system_component(),
            CompletenessItem::MultipleLogs => evidence.system_log_count >= 2,
        }
    }
}

impl fmt::Display for CompletenessItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score contributed by one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierScore {
    pub tier: Tier,
    pub satisfied: usize,
    pub total: usize,
    pub score: Decimal,
}

/// Full completeness breakdown for a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completeness {
    pub tiers: Vec<TierScore>,
    pub missing: Vec<CompletenessItem>,
}

impl Completeness {
    /// Exact total as a decimal
    pub fn total(&self) -> Decimal {
        self.tiers.iter().map(|t| t.score).sum()
    }

    /// Total as reported to callers
    pub fn score(&self) -> f64 {
        self.total().normalize().to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
    }

    pub fn is_missing(&self, item: CompletenessItem) -> bool {
        self.missing.contains(&item)
    }
}

/// Scores every tier and collects unsatisfied items in reporting order
pub fn score_tiers(claim: &OperationalLiabilityClaim) -> Completeness {
    let mut missing = Vec::new();
    let tiers = Tier::ALL
        .iter()
        .map(|tier| {
            let mut satisfied = 0usize;
            let mut total = 0usize;
            for item in tier.items() {
                total += 1;
                if item.is_satisfied(claim) {
                    satisfied += 1;
                } else {
                    missing.push(item);
                }
            }
            let score = if total == 0 {
                Decimal::ZERO
            } else {
                tier.weight() * Decimal::from(satisfied as u64) / Decimal::from(total as u64)
            };
            TierScore {
                tier: *tier,
                satisfied,
                total,
                score,
            }
        })
        .collect();

    Completeness { tiers, missing }
}
