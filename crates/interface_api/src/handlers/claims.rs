//! Claim check handler

use axum::{Extension, Json};
use tracing::debug;

use domain_claims::{check, CheckReport};

use crate::auth::{permissions, require_permission, Claims};
use crate::dto::ClaimRequest;
use crate::error::ApiError;

/// Scores completeness and lists contradictions and follow-up questions
pub async fn check_claim(
    Extension(user): Extension<Claims>,
    Json(request): Json<ClaimRequest>,
) -> Result<Json<CheckReport>, ApiError> {
    require_permission(&user, permissions::CLAIM_CHECK)?;

    let claim = request.into_claim()?;
    let report = check(&claim);
    debug!(
        claim_id = %claim.claim_id,
        score = report.completeness_score,
        contradictions = report.contradictions.len(),
        "Claim checked"
    );

    Ok(Json(report))
}
