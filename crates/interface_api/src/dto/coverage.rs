//! Coverage evaluation payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ClaimId;
use domain_claims::{AgentContext, CheckReport, ClaimProgress, ResolutionDecision};
use domain_policy::{CoverageResult, PolicyVerification};

use super::claims::ClaimRequest;

/// Body of `POST /coverage/evaluate`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EvaluateRequest {
    #[validate(nested)]
    pub claim: ClaimRequest,
    /// Set by the fraud screen upstream
    #[serde(default)]
    pub fraud_flagged: bool,
}

/// Everything the intake agent and the adjuster need about one claim
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub claim_id: ClaimId,
    pub verification: PolicyVerification,
    /// Absent when no policy matched
    pub coverage: Option<CoverageResult>,
    pub payout: Option<Decimal>,
    pub required_extra_info: Vec<String>,
    pub can_auto_resolve: bool,
    pub decision: Option<ResolutionDecision>,
    pub progress: ClaimProgress,
    pub report: CheckReport,
    pub agent_context: AgentContext,
}

/// Body of `POST /coverage/llm`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LlmCoverageRequest {
    #[validate(nested)]
    pub claim: ClaimRequest,
    /// Per-call timeout; the configured default applies when absent
    #[serde(default)]
    #[validate(range(min = 1, max = 120000))]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct LlmCoverageResponse {
    pub verification: PolicyVerification,
    pub coverage: CoverageResult,
}
