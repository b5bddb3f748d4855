//! Policy handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use validator::Validate;

use domain_policy::{Policy, PolicyDocument, DEFAULT_LIST_LIMIT};

use crate::auth::{permissions, require_permission, Claims};
use crate::dto::{ListPoliciesQuery, PolicyListResponse};
use crate::error::ApiError;
use crate::AppState;

/// Lists stored policies ordered by number
pub async fn list_policies(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Query(query): Query<ListPoliciesQuery>,
) -> Result<Json<PolicyListResponse>, ApiError> {
    require_permission(&user, permissions::POLICY_READ)?;
    query.validate()?;

    let policies = state
        .coverage
        .list_policies(query.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;

    Ok(Json(PolicyListResponse::new(
        policies.into_iter().map(PolicyDocument::from).collect(),
    )))
}

/// Gets a policy by number, falling back to its digits
pub async fn get_policy(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Path(number): Path<String>,
) -> Result<Json<PolicyDocument>, ApiError> {
    require_permission(&user, permissions::POLICY_READ)?;

    state
        .coverage
        .get_policy(&number)
        .await?
        .map(|policy| Json(PolicyDocument::from(policy)))
        .ok_or_else(|| ApiError::NotFound(format!("Policy {} not found", number.trim())))
}

/// Replaces the whole policy record
///
/// The number in the body may be omitted; if given it must match the path.
pub async fn replace_policy(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Path(number): Path<String>,
    Json(mut document): Json<PolicyDocument>,
) -> Result<Json<PolicyDocument>, ApiError> {
    require_permission(&user, permissions::POLICY_WRITE)?;

    let number = number.trim().to_string();
    if document.policy_number.trim().is_empty() {
        document.policy_number = number.clone();
    } else if document.policy_number.trim() != number {
        return Err(ApiError::BadRequest(format!(
            "policy number in body ({}) does not match path ({})",
            document.policy_number.trim(),
            number
        )));
    }

    let policy = Policy::try_from(document)?;
    state.coverage.save_policy(&policy).await?;
    tracing::info!(policy_number = %policy.policy_number, user = %user.sub, "Policy replaced");

    Ok(Json(PolicyDocument::from(policy)))
}
