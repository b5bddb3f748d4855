//! Evidence completeness and consistency checker
//!
//! [`check`] is pure and total: any claim, however sparse, yields a report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claim::OperationalLiabilityClaim;
use crate::completeness::score_tiers;
use crate::consistency::detect_contradictions;
use crate::questions::recommend;

/// What the checker found for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Weighted completeness in `[0, 1]`
    pub completeness_score: f64,
    pub missing_required_evidence: Vec<String>,
    pub contradictions: Vec<String>,
    /// At most three, most important first
    pub recommended_questions: Vec<String>,
}

impl CheckReport {
    pub fn is_complete(&self) -> bool {
        self.missing_required_evidence.is_empty()
    }

    pub fn has_contradictions(&self) -> bool {
        !self.contradictions.is_empty()
    }
}

/// Checks a claim as of the current instant
pub fn check(claim: &OperationalLiabilityClaim) -> CheckReport {
    check_at(claim, Utc::now())
}

/// Checks a claim as of `now`
pub fn check_at(claim: &OperationalLiabilityClaim, now: DateTime<Utc>) -> CheckReport {
    let completeness = score_tiers(claim);
    let contradictions = detect_contradictions(claim, now);
    let questions = recommend(claim, &completeness);

    let report = CheckReport {
        completeness_score: completeness.score(),
        missing_required_evidence: completeness
            .missing
            .iter()
            .map(|item| item.as_str().to_string())
            .collect(),
        contradictions: contradictions.iter().map(ToString::to_string).collect(),
        recommended_questions: questions.iter().map(|q| q.question().to_string()).collect(),
    };

    debug!(
        claim_id = %claim.claim_id,
        score = report.completeness_score,
        missing = report.missing_required_evidence.len(),
        contradictions = report.contradictions.len(),
        "Claim checked"
    );

    report
}
