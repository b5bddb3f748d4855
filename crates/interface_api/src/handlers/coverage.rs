//! Coverage handlers

use axum::{extract::State, Extension, Json};
use std::time::Duration;
use validator::Validate;

use domain_claims::{check, AgentContext, ClaimProgress};
use domain_policy::policy_issue_message;

use crate::auth::{permissions, require_permission, Claims};
use crate::dto::{EvaluateRequest, EvaluateResponse, LlmCoverageRequest, LlmCoverageResponse};
use crate::error::ApiError;
use crate::AppState;

/// Runs the checker and the rule-based engine over one claim
///
/// A claim whose policy cannot be found still gets its check report and
/// agent context; coverage and the decision are then left empty.
pub async fn evaluate(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    require_permission(&user, permissions::COVERAGE_EVALUATE)?;

    let fraud_flagged = request.fraud_flagged;
    let claim = request.claim.into_claim()?;
    let report = check(&claim);

    let (policy, verification) = state
        .coverage
        .verify_policy(&claim.claimant.policy_number, &claim.claimant.name)
        .await?;

    let mut progress = ClaimProgress::new(claim.claim_id);
    progress.record_evaluation()?;

    let policy_issue = policy_issue_message(
        policy.as_ref(),
        &claim.claimant.policy_number,
        verification.is_verified(),
    );
    let agent_context = AgentContext::from_report(&report, policy_issue);

    let response = match policy {
        Some(policy) => {
            let name_verified = verification.is_verified();
            let coverage = state.coverage.check_coverage(&claim, &policy);
            let payout = state.coverage.compute_payout(&claim, &policy);
            let required_extra_info = state.coverage.get_required_extra_info(&claim, &policy);
            let can_auto_resolve =
                state
                    .coverage
                    .can_auto_resolve(&claim, &policy, name_verified, fraud_flagged);
            let decision = state.coverage.decide(&claim, &policy, name_verified, fraud_flagged);
            progress.resolve(decision.clone())?;

            EvaluateResponse {
                claim_id: claim.claim_id,
                verification,
                coverage: Some(coverage),
                payout,
                required_extra_info,
                can_auto_resolve,
                decision: Some(decision),
                progress,
                report,
                agent_context,
            }
        }
        None => EvaluateResponse {
            claim_id: claim.claim_id,
            verification,
            coverage: None,
            payout: None,
            required_extra_info: Vec::new(),
            can_auto_resolve: false,
            decision: None,
            progress,
            report,
            agent_context,
        },
    };

    Ok(Json(response))
}

/// Model-backed coverage decision
///
/// Model failures come back as a not-covered result, not as an error status.
pub async fn evaluate_llm(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Json(request): Json<LlmCoverageRequest>,
) -> Result<Json<LlmCoverageResponse>, ApiError> {
    require_permission(&user, permissions::COVERAGE_EVALUATE)?;
    request.validate()?;

    let timeout = request.timeout_ms.map(Duration::from_millis);
    let claim = request.claim.into_claim()?;

    let (policy, verification) = state
        .coverage
        .verify_policy(&claim.claimant.policy_number, &claim.claimant.name)
        .await?;
    let policy = policy.ok_or_else(|| {
        ApiError::NotFound(format!("Policy {} not found", claim.claimant.policy_number.trim()))
    })?;

    let coverage = state.coverage.check_coverage_llm(&claim, &policy, timeout).await;

    Ok(Json(LlmCoverageResponse { verification, coverage }))
}
