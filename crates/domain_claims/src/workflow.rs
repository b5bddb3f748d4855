//! Claim resolution workflow
//!
//! ```text
//! Intake -> Evaluated (repeatable) -> AutoResolved | HumanReview
//! ```
//!
//! The engine only supplies the decision; recording it is the caller's job.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::ClaimId;

use crate::error::ClaimError;
use crate::vocabulary::IncidentType;

/// Where a claim is in the resolution flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStage {
    Intake,
    Evaluated,
    AutoResolved,
    HumanReview,
}

impl ClaimStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStage::AutoResolved | ClaimStage::HumanReview)
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStage) -> bool {
        use ClaimStage::*;
        matches!(
            (self, target),
            (Intake, Evaluated) |
            (Evaluated, Evaluated) |
            (Evaluated, AutoResolved) |
            (Evaluated, HumanReview)
        )
    }
}

impl fmt::Display for ClaimStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClaimStage::Intake => "intake",
            ClaimStage::Evaluated => "evaluated",
            ClaimStage::AutoResolved => "auto_resolved",
            ClaimStage::HumanReview => "routed_to_human_review",
        };
        f.write_str(s)
    }
}

/// Why a claim could not be settled automatically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReviewReason {
    FraudFlagged,
    NameMismatch,
    IncidentTypeNotCovered { incident_type: IncidentType },
    AmountAboveAutoResolveLimit { amount: Decimal, limit: Decimal },
    EvidenceOutstanding { items: Vec<String> },
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewReason::FraudFlagged => f.write_str("Claim flagged for possible fraud"),
            ReviewReason::NameMismatch => f.write_str("Claimant name does not match the named insured"),
            ReviewReason::IncidentTypeNotCovered { incident_type } => {
                write!(f, "Incident type '{}' is not covered", incident_type)
            }
            ReviewReason::AmountAboveAutoResolveLimit { amount, limit } => write!(
                f,
                "Estimated cost ${:.2} exceeds auto-resolve limit ${:.2}",
                amount, limit
            ),
            ReviewReason::EvidenceOutstanding { items } => {
                write!(f, "Outstanding evidence: {}", items.join("; "))
            }
        }
    }
}

/// Outcome of the auto-resolve gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionDecision {
    AutoResolve { payout: Option<Decimal> },
    HumanReview { reasons: Vec<ReviewReason> },
}

impl ResolutionDecision {
    pub fn is_auto_resolve(&self) -> bool {
        matches!(self, ResolutionDecision::AutoResolve { .. })
    }

    /// Stage a claim moves to when this decision is recorded
    pub fn target_stage(&self) -> ClaimStage {
        match self {
            ResolutionDecision::AutoResolve { .. } => ClaimStage::AutoResolved,
            ResolutionDecision::HumanReview { .. } => ClaimStage::HumanReview,
        }
    }
}

/// Progress of one claim through the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimProgress {
    pub claim_id: ClaimId,
    pub stage: ClaimStage,
    pub evaluations: u32,
    pub decision: Option<ResolutionDecision>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimProgress {
    pub fn new(claim_id: ClaimId) -> Self {
        Self {
            claim_id,
            stage: ClaimStage::Intake,
            evaluations: 0,
            decision: None,
            updated_at: Utc::now(),
        }
    }

    /// Records another checker/coverage pass
    pub fn record_evaluation(&mut self) -> Result<(), ClaimError> {
        self.advance(ClaimStage::Evaluated)?;
        self.evaluations += 1;
        Ok(())
    }

    /// Records the final decision
    pub fn resolve(&mut self, decision: ResolutionDecision) -> Result<(), ClaimError> {
        self.advance(decision.target_stage())?;
        self.decision = Some(decision);
        Ok(())
    }

    fn advance(&mut self, target: ClaimStage) -> Result<(), ClaimError> {
        if self.stage.is_terminal() {
            return Err(ClaimError::AlreadyResolved);
        }
        if !self.stage.can_transition_to(target) {
            return Err(ClaimError::InvalidStageTransition {
                from: self.stage,
                to: target,
            });
        }
        self.stage = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}
